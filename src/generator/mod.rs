//! Generator module - pre-renders every enumerated post page

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::content::StaticPaths;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Static page generator
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Render every path; the first failure aborts generation
    pub fn generate(&self, paths: &StaticPaths) -> Result<usize> {
        fs::create_dir_all(&self.blog.public_dir)?;

        let mut count = 0;
        for slug in paths.slugs() {
            self.generate_post(slug)?;
            count += 1;
        }

        Ok(count)
    }

    /// Resolve and write one post page plus its props
    pub fn generate_post(&self, slug: &str) -> Result<PathBuf> {
        if !is_safe_slug(slug) {
            anyhow::bail!("Refusing to write post with unsafe slug {:?}", slug);
        }

        let props = self
            .blog
            .static_props(slug)
            .with_context(|| format!("Failed to resolve post '{}'", slug))?;

        let html = self.renderer.render_post(
            &self.blog.config,
            &props.props,
            self.blog.richtext.as_ref(),
        )?;

        let output_dir = self.blog.public_dir.join("post").join(slug);
        fs::create_dir_all(&output_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", output_dir, e))?;

        let output_path = output_dir.join("index.html");
        fs::write(&output_path, &html)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        fs::write(
            output_dir.join("props.json"),
            serde_json::to_string_pretty(&props)?,
        )?;

        tracing::debug!("Generated post: {:?}", output_path);
        Ok(output_path)
    }
}

/// A slug must map to exactly one directory below `public/post`
fn is_safe_slug(slug: &str) -> bool {
    let mut components = Path::new(slug).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !slug.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::store::{MemoryStore, RawDocument};
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn blog(dir: &TempDir) -> Blog {
        let store = MemoryStore::new(vec![
            RawDocument::new("posts", "a").with_field("title", json!("A")),
            RawDocument::new("posts", "b").with_field("title", json!("B")),
        ]);
        Blog::with_store(dir.path(), SiteConfig::default(), Arc::new(store))
    }

    #[test]
    fn test_generate_all_paths() {
        let tmp = TempDir::new().unwrap();
        let blog = blog(&tmp);
        let paths = blog.static_paths().unwrap();
        let count = Generator::new(&blog).unwrap().generate(&paths).unwrap();

        assert_eq!(count, 2);
        let html = fs::read_to_string(tmp.path().join("public/post/a/index.html")).unwrap();
        assert!(html.contains("<h1>A</h1>"));
        assert!(html.contains(r#"href="/post/b""#));

        let props = fs::read_to_string(tmp.path().join("public/post/b/props.json")).unwrap();
        let props: serde_json::Value = serde_json::from_str(&props).unwrap();
        assert_eq!(props["revalidate"], json!(1800));
        assert_eq!(props["props"]["navigationItems"]["previousPost"]["uid"], json!("a"));
    }

    #[test]
    fn test_unknown_slug_fails() {
        let tmp = TempDir::new().unwrap();
        let err = Generator::new(&blog(&tmp))
            .unwrap()
            .generate_post("missing")
            .unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_unsafe_slug_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec![
            RawDocument::new("posts", "../escape").with_field("title", json!("Escape")),
        ]);
        let blog = Blog::with_store(tmp.path(), SiteConfig::default(), Arc::new(store));
        let generator = Generator::new(&blog).unwrap();

        let err = generator.generate_post("../escape").unwrap_err();
        assert!(err.to_string().contains("unsafe slug"));
        assert!(!tmp.path().join("public/escape").exists());

        let paths = blog.static_paths().unwrap();
        assert!(generator.generate(&paths).is_err());
        assert!(!tmp.path().join("public/escape").exists());
    }

    #[test]
    fn test_slug_safety() {
        assert!(is_safe_slug("como-utilizar-hooks"));
        assert!(is_safe_slug("caf\u{e9}"));
        for slug in ["", ".", "..", "a/b", "/abs", "a\\b", "../x"] {
            assert!(!is_safe_slug(slug), "{:?} should be unsafe", slug);
        }
    }
}
