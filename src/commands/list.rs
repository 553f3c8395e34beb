//! List enumerated paths and the navigation corpus

use anyhow::Result;

use crate::content::SiblingNavigator;
use crate::store::Projection;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    match content_type {
        "path" | "paths" => {
            let paths = blog.static_paths()?;
            println!("Paths ({}, fallback: {:?}):", paths.paths.len(), paths.fallback);
            for slug in paths.slugs() {
                println!("  /post/{}", slug);
            }
        }
        "corpus" | "navigation" => {
            let corpus_type = blog.config.store.corpus_type();
            let documents = blog
                .store
                .list_corpus(corpus_type, &Projection::for_type(corpus_type, &["title"]))?;
            let listing = SiblingNavigator::listing(&documents);
            println!("Corpus {} ({}):", corpus_type, listing.len());
            for (i, record) in listing.iter().enumerate() {
                match record.entry() {
                    Some(entry) => println!("  {:>3}. {} [{}]", i, entry.title, entry.uid),
                    None => println!(
                        "  {:>3}. (incomplete: uid {:?}, title {:?})",
                        i, record.uid, record.title
                    ),
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: paths, corpus",
                content_type
            );
        }
    }

    Ok(())
}
