//! Path enumeration for pre-rendering

use serde::Serialize;
use std::sync::Arc;

use crate::store::{ContentStore, Projection, StoreError};

/// What to do with slugs that were not enumerated ahead of time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fallback {
    /// Resolve synchronously on first request, then cache
    Blocking,
}

/// Route parameters of one pre-rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathParams {
    pub slug: String,
}

/// The set of pages to pre-render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticPaths {
    pub paths: Vec<PathParams>,
    pub fallback: Fallback,
}

impl StaticPaths {
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|p| p.slug.as_str())
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.slugs().any(|s| s == slug)
    }
}

/// Lists every article identifier in the store
#[derive(Clone)]
pub struct PathEnumerator {
    store: Arc<dyn ContentStore>,
    content_type: String,
    projection: Projection,
}

impl PathEnumerator {
    pub fn new(store: Arc<dyn ContentStore>, content_type: &str) -> Self {
        Self {
            projection: Projection::for_type(content_type, &["title", "subtitle", "author"]),
            store,
            content_type: content_type.to_string(),
        }
    }

    /// Enumerate the paths to pre-render
    ///
    /// A failing query fails the whole enumeration.
    pub fn static_paths(&self) -> Result<StaticPaths, StoreError> {
        let documents = self
            .store
            .list_identifiers(&self.content_type, &self.projection)?;

        let paths: Vec<_> = documents
            .into_iter()
            .filter_map(|doc| doc.uid)
            .map(|slug| PathParams { slug })
            .collect();

        tracing::info!("Enumerated {} {} paths", paths.len(), self.content_type);

        Ok(StaticPaths {
            paths,
            fallback: Fallback::Blocking,
        })
    }
}
