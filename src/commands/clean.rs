//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Blog;

/// Remove every generated page
pub fn run(blog: &Blog) -> Result<()> {
    if blog.public_dir.exists() {
        fs::remove_dir_all(&blog.public_dir)?;
        tracing::info!("Deleted: {:?}", blog.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::store::MemoryStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_public_dir() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::with_store(tmp.path(), SiteConfig::default(), Arc::new(MemoryStore::default()));
        fs::create_dir_all(blog.public_dir.join("post/a")).unwrap();

        run(&blog).unwrap();
        assert!(!blog.public_dir.exists());
        // Nothing left to delete is fine
        run(&blog).unwrap();
    }
}
