//! spacetraveling: article pages for a CMS-backed blog
//!
//! This crate resolves a single article from a content store, computes its
//! reading time and its previous/next siblings, and renders the page. Pages
//! can be pre-rendered to disk or served with time-based revalidation.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod richtext;
pub mod server;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use content::{PageResolver, PathEnumerator, ResolveError, StaticPaths, StaticProps};
use richtext::{HtmlRenderer, RichTextRenderer};
use store::{ContentStore, FileStore, StoreError};
use templates::TemplateRenderer;

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Content store every page is resolved from
    pub store: Arc<dyn ContentStore>,
    /// Rich-text converter used at render time
    pub richtext: Arc<dyn RichTextRenderer>,
}

impl Blog {
    /// Create a new blog from a directory, reading documents from its content dir
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let store = FileStore::new(base_dir.join(&config.content_dir));
        Ok(Self::with_store(base_dir, config, Arc::new(store)))
    }

    /// Create a blog over an explicit store
    pub fn with_store<P: AsRef<Path>>(
        base_dir: P,
        config: config::SiteConfig,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);

        if !config.store.is_consistent() {
            tracing::warn!(
                "Paths are enumerated from '{}' but navigation lists '{}'; posts missing from the corpus get no navigation",
                config.store.post_type,
                config.store.corpus_type()
            );
        }

        Self {
            config,
            base_dir,
            public_dir,
            store,
            richtext: Arc::new(HtmlRenderer::new()),
        }
    }

    /// Every slug to pre-render
    pub fn static_paths(&self) -> Result<StaticPaths, StoreError> {
        PathEnumerator::new(self.store.clone(), &self.config.store.post_type).static_paths()
    }

    /// Resolve the page data for `slug`
    pub fn static_props(&self, slug: &str) -> Result<StaticProps, ResolveError> {
        self.page_resolver().static_props(slug)
    }

    /// Render resolved page data to HTML
    pub fn render(&self, props: &StaticProps) -> Result<String> {
        let renderer = TemplateRenderer::new()?;
        renderer.render_post(&self.config, &props.props, self.richtext.as_ref())
    }

    /// Generate every enumerated page into the public directory
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    fn page_resolver(&self) -> PageResolver {
        PageResolver::new(
            self.store.clone(),
            &self.config.store.post_type,
            self.config.store.corpus_type(),
            self.config.revalidate_after(),
        )
    }
}
