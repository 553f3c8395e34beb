//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Date / Time format
    pub date_format: String,

    /// Seconds a resolved page may be served before it is refreshed
    pub revalidate: u64,

    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub reading: ReadingConfig,
    #[serde(default)]
    pub comments: CommentsConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            language: "pt-BR".to_string(),
            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),

            date_format: "DD MMM YYYY".to_string(),

            revalidate: 60 * 30,

            store: StoreConfig::default(),
            reading: ReadingConfig::default(),
            comments: CommentsConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Revalidation window as a duration
    pub fn revalidate_after(&self) -> Duration {
        Duration::from_secs(self.revalidate)
    }
}

/// Content store selectors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Content type of the articles (path enumeration and single fetch)
    pub post_type: String,
    /// Content type queried for the navigation corpus; falls back to `post_type`
    pub corpus_type: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            post_type: "posts".to_string(),
            corpus_type: None,
        }
    }
}

impl StoreConfig {
    /// Content type used for the corpus listing
    pub fn corpus_type(&self) -> &str {
        self.corpus_type.as_deref().unwrap_or(&self.post_type)
    }

    /// Whether both queries point at the same corpus
    pub fn is_consistent(&self) -> bool {
        self.corpus_type() == self.post_type
    }
}

/// Reading time settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    pub words_per_minute: usize,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
        }
    }
}

/// Utterances comment widget settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub script: String,
    /// GitHub repository backing the comments; empty disables the widget
    pub repo: String,
    pub issue_term: String,
    pub label: String,
    pub theme: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            script: "https://utteranc.es/client.js".to_string(),
            repo: String::new(),
            issue_term: "pathname".to_string(),
            label: "blog".to_string(),
            theme: "github-dark".to_string(),
        }
    }
}

impl CommentsConfig {
    pub fn enabled(&self) -> bool {
        !self.repo.is_empty()
    }
}
