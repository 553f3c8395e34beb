//! Resolve a single post and print it

use anyhow::Result;

use crate::Blog;

/// Print the static props of `slug` as JSON, or the rendered page
pub fn run(blog: &Blog, slug: &str, html: bool) -> Result<()> {
    let props = blog.static_props(slug)?;

    if html {
        println!("{}", blog.render(&props)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&props)?);
    }

    Ok(())
}
