//! Content resolution: one store document in, one normalized [`Post`] out

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use super::{Post, RichTextBlock, Section};
use crate::store::{ContentStore, RawDocument, StoreError};

/// Errors raised while resolving a post
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Document '{uid}' does not match the post schema: {source}")]
    Schema {
        uid: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {field} on '{uid}': {value}")]
    InvalidDate {
        uid: String,
        field: &'static str,
        value: String,
    },

    #[error("Document of type {0} has no uid")]
    MissingUid(String),
}

impl ResolveError {
    /// Whether the post simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::Store(e) if e.is_not_found())
    }
}

/// Shape of a post document's `data`
#[derive(Debug, Deserialize)]
struct RawPostData {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    banner: Option<RawImage>,
    #[serde(default)]
    content: Vec<RawSection>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(default)]
    heading: Option<String>,
    #[serde(default)]
    body: Vec<serde_json::Value>,
}

/// Fetches a post by slug and normalizes it
#[derive(Clone)]
pub struct ContentResolver {
    store: Arc<dyn ContentStore>,
    content_type: String,
}

impl ContentResolver {
    pub fn new(store: Arc<dyn ContentStore>, content_type: &str) -> Self {
        Self {
            store,
            content_type: content_type.to_string(),
        }
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Fetch and normalize the post identified by `slug`
    pub fn resolve(&self, slug: &str) -> Result<Post, ResolveError> {
        let doc = self.store.get_by_uid(&self.content_type, slug)?;
        let post = normalize(doc)?;
        tracing::debug!("Resolved post '{}' ({} sections)", post.uid, post.content.len());
        Ok(post)
    }
}

/// Map a raw store document into a [`Post`]
pub fn normalize(doc: RawDocument) -> Result<Post, ResolveError> {
    let uid = doc
        .uid
        .ok_or_else(|| ResolveError::MissingUid(doc.doc_type.clone()))?;

    let data: RawPostData = serde_json::from_value(serde_json::Value::Object(doc.data))
        .map_err(|source| ResolveError::Schema {
            uid: uid.clone(),
            source,
        })?;

    let first_publication_date = doc
        .first_publication_date
        .as_deref()
        .map(|value| {
            parse_publication_date(value).ok_or_else(|| ResolveError::InvalidDate {
                uid: uid.clone(),
                field: "first_publication_date",
                value: value.to_string(),
            })
        })
        .transpose()?;

    let content = data
        .content
        .into_iter()
        .map(|section| Section {
            heading: section.heading.unwrap_or_default(),
            body: section.body.into_iter().map(RichTextBlock::new).collect(),
        })
        .collect();

    Ok(Post {
        uid,
        first_publication_date,
        title: data.title.unwrap_or_default(),
        subtitle: data.subtitle.unwrap_or_default(),
        author: data.author.unwrap_or_default(),
        banner_url: data.banner.and_then(|b| b.url),
        content,
    })
}

/// Parse a store timestamp (RFC 3339, or `+0000` style offsets)
pub fn parse_publication_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|d| d.with_timezone(&Utc))
        .ok()
}
