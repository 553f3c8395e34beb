//! Directory-backed content store
//!
//! Layout: `<root>/<content type>/<name>.json`, one [`RawDocument`] per file.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentStore, Projection, RawDocument, StoreError};

/// Reads documents exported from the CMS as JSON files
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every document of a type, ordered by file name
    fn load_type(&self, content_type: &str) -> Result<Vec<RawDocument>, StoreError> {
        let dir = self.root.join(content_type);
        if !dir.is_dir() {
            tracing::debug!("No content directory for type {}: {:?}", content_type, dir);
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| StoreError::Io(e.into()))?;
            let path = entry.path();
            if path.is_file() && is_json_file(path) {
                documents.push(load_document(path, content_type)?);
            }
        }

        Ok(documents)
    }
}

impl ContentStore for FileStore {
    fn get_by_uid(&self, content_type: &str, uid: &str) -> Result<RawDocument, StoreError> {
        self.load_type(content_type)?
            .into_iter()
            .find(|d| d.uid.as_deref() == Some(uid))
            .ok_or_else(|| StoreError::NotFound {
                content_type: content_type.to_string(),
                uid: uid.to_string(),
            })
    }

    fn list_corpus(
        &self,
        content_type: &str,
        projection: &Projection,
    ) -> Result<Vec<RawDocument>, StoreError> {
        let documents = self.load_type(content_type)?;
        tracing::debug!("Listed {} {} documents", documents.len(), content_type);
        Ok(documents.into_iter().map(|d| projection.apply(d)).collect())
    }
}

fn load_document(path: &Path, content_type: &str) -> Result<RawDocument, StoreError> {
    let content = fs::read_to_string(path)?;
    let mut doc: RawDocument =
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if doc.doc_type.is_empty() {
        doc.doc_type = content_type.to_string();
    }
    Ok(doc)
}

/// Check if a file is a JSON document
fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "json")
        .unwrap_or(false)
}
