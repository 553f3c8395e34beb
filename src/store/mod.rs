//! Content store boundary
//!
//! The store is the only I/O the resolution pipeline performs. Everything it
//! returns is a [`RawDocument`]: the loosely shaped record the CMS hands out,
//! before any normalization.

mod fs;
mod memory;

pub use fs::FileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Content store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No {content_type} document with uid '{uid}'")]
    NotFound { content_type: String, uid: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Content store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// A document as returned by the content store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub uid: Option<String>,

    #[serde(rename = "type", default)]
    pub doc_type: String,

    #[serde(default)]
    pub first_publication_date: Option<String>,

    #[serde(default)]
    pub last_publication_date: Option<String>,

    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl RawDocument {
    /// Create an empty document of the given type
    pub fn new(doc_type: &str, uid: &str) -> Self {
        Self {
            id: None,
            uid: Some(uid.to_string()),
            doc_type: doc_type.to_string(),
            first_publication_date: None,
            last_publication_date: None,
            data: serde_json::Map::new(),
        }
    }

    /// Builder-style setter for a data field
    pub fn with_field(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    /// Read a data field as a string
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }
}

/// Field selection applied to a query's `data` payload
///
/// Selectors are either `"<type>.<field>"` or a bare `"<field>"`. An empty
/// projection keeps every field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    /// Keep every field
    pub fn all() -> Self {
        Self::default()
    }

    pub fn fields<S: AsRef<str>>(fields: &[S]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
        }
    }

    /// Selectors qualified with a content type, e.g. `posts.title`
    pub fn for_type(content_type: &str, fields: &[&str]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|f| format!("{}.{}", content_type, f))
                .collect(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.fields.is_empty()
    }

    fn keeps(&self, content_type: &str, key: &str) -> bool {
        self.fields.iter().any(|selector| match selector.split_once('.') {
            Some((ty, field)) => ty == content_type && field == key,
            None => selector == key,
        })
    }

    /// Drop the data fields this projection does not select
    pub fn apply(&self, mut doc: RawDocument) -> RawDocument {
        if self.is_all() {
            return doc;
        }
        let doc_type = doc.doc_type.clone();
        doc.data.retain(|key, _| self.keeps(&doc_type, key));
        doc
    }
}

/// Query surface of the content store
pub trait ContentStore: Send + Sync {
    /// Every document of a content type, reduced to what path enumeration needs
    fn list_identifiers(
        &self,
        content_type: &str,
        projection: &Projection,
    ) -> Result<Vec<RawDocument>, StoreError> {
        self.list_corpus(content_type, projection)
    }

    /// A single document by uid
    fn get_by_uid(&self, content_type: &str, uid: &str) -> Result<RawDocument, StoreError>;

    /// Every document of a content type, in the store's default order
    fn list_corpus(
        &self,
        content_type: &str,
        projection: &Projection,
    ) -> Result<Vec<RawDocument>, StoreError>;
}
