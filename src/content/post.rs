//! Post and navigation models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resolved article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier (slug)
    pub uid: String,

    /// First publication date, absent for drafts
    pub first_publication_date: Option<DateTime<Utc>>,

    /// Post title
    pub title: String,

    /// Post subtitle
    pub subtitle: String,

    /// Author display name
    pub author: String,

    /// Banner image URL, `None` when the document has no banner
    pub banner_url: Option<String>,

    /// Ordered content sections
    pub content: Vec<Section>,
}

/// One titled section of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section heading, also the section's display key
    pub heading: String,

    /// Rich-text blocks in display order
    pub body: Vec<RichTextBlock>,
}

/// A rich-text block, kept exactly as the store returned it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichTextBlock(serde_json::Value);

impl RichTextBlock {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Plain text of the block, if it carries any
    pub fn text(&self) -> Option<&str> {
        self.0.get("text").and_then(|t| t.as_str())
    }

    /// Block type (`paragraph`, `heading2`, ...)
    pub fn block_type(&self) -> Option<&str> {
        self.0.get("type").and_then(|t| t.as_str())
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Reference to a sibling article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub uid: String,
    pub title: String,
}

impl NavigationEntry {
    pub fn new(uid: &str, title: &str) -> Self {
        Self {
            uid: uid.to_string(),
            title: title.to_string(),
        }
    }
}

/// One record of the corpus listing, as the store returned it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusRecord {
    pub uid: Option<String>,
    pub title: Option<String>,
}

impl CorpusRecord {
    pub fn new(uid: &str, title: &str) -> Self {
        Self {
            uid: Some(uid.to_string()),
            title: Some(title.to_string()),
        }
    }

    /// Navigation entry for this record; `None` unless uid and title are both set
    pub fn entry(&self) -> Option<NavigationEntry> {
        match (self.uid.as_deref(), self.title.as_deref()) {
            (Some(uid), Some(title)) if !uid.is_empty() && !title.is_empty() => {
                Some(NavigationEntry::new(uid, title))
            }
            _ => None,
        }
    }
}

/// Ordered corpus records; adjacency is positional
pub type CorpusListing = Vec<CorpusRecord>;

/// Previous/next links of a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItems {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_post: Option<NavigationEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_post: Option<NavigationEntry>,
}

impl NavigationItems {
    pub fn is_empty(&self) -> bool {
        self.next_post.is_none() && self.previous_post.is_none()
    }
}

/// Everything the post page needs to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub post: Post,
    pub navigation_items: NavigationItems,
}
