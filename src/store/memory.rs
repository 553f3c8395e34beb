//! In-memory content store

use super::{ContentStore, Projection, RawDocument, StoreError};

/// A store backed by a fixed list of documents
///
/// Documents are returned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Vec<RawDocument>,
}

impl MemoryStore {
    pub fn new(documents: Vec<RawDocument>) -> Self {
        Self { documents }
    }

    /// Append a document
    pub fn push(&mut self, doc: RawDocument) {
        self.documents.push(doc);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl ContentStore for MemoryStore {
    fn get_by_uid(&self, content_type: &str, uid: &str) -> Result<RawDocument, StoreError> {
        self.documents
            .iter()
            .find(|d| d.doc_type == content_type && d.uid.as_deref() == Some(uid))
            .cloned()
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
        Ok(self
            .documents
            .iter()
            .filter(|d| d.doc_type == content_type)
            .cloned()
            .map(|d| projection.apply(d))
            .collect())
    }
}
