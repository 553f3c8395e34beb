//! Built-in post page templates using the Tera template engine
//!
//! Templates are embedded in the binary; no theme directory is needed.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{NavigationEntry, PostPage, ReadingTimeEstimator};
use crate::helpers::{comments_widget, date_xml, format_date, full_url_for, image_tag, post_url};
use crate::richtext::RichTextRenderer;

/// Template renderer for the post page
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Values are escaped explicitly in the templates; rendered rich text must pass as-is
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("page/layout.html")),
            ("post.html", include_str!("page/post.html")),
            (
                "partials/head.html",
                include_str!("page/partials/head.html"),
            ),
            (
                "partials/header.html",
                include_str!("page/partials/header.html"),
            ),
            (
                "partials/navigation.html",
                include_str!("page/partials/navigation.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the full post page
    pub fn render_post(
        &self,
        config: &SiteConfig,
        page: &PostPage,
        richtext: &dyn RichTextRenderer,
    ) -> Result<String> {
        let estimator = ReadingTimeEstimator::new(config.reading.words_per_minute);
        let post = PostView::build(config, page, richtext, &estimator);

        let mut context = Context::new();
        context.insert("config", &ConfigData::from(config));
        context.insert("page_title", &page.post.title);
        context.insert("permalink", &full_url_for(config, &post_url(config, &page.post.uid)));
        context.insert("post", &post);
        context.insert("comments", &comments_widget(&config.comments));

        if let Some(ref previous) = page.navigation_items.previous_post {
            context.insert("previous_post", &NavLink::new(config, previous));
        }
        if let Some(ref next) = page.navigation_items.next_post {
            context.insert("next_post", &NavLink::new(config, next));
        }

        self.render("post.html", &context)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub language: String,
    pub root: String,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        let root = if config.root.ends_with('/') {
            config.root.clone()
        } else {
            format!("{}/", config.root)
        };
        Self {
            title: config.title.clone(),
            language: config.language.clone(),
            root,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub author: String,
    pub banner: Option<String>,
    pub date: Option<String>,
    pub datetime: Option<String>,
    pub reading_time: usize,
    pub sections: Vec<SectionView>,
}

impl PostView {
    pub fn build(
        config: &SiteConfig,
        page: &PostPage,
        richtext: &dyn RichTextRenderer,
        estimator: &ReadingTimeEstimator,
    ) -> Self {
        let post = &page.post;
        Self {
            title: post.title.clone(),
            author: post.author.clone(),
            banner: post
                .banner_url
                .as_deref()
                .map(|url| image_tag(url, Some("banner"), Some("banner"))),
            date: post
                .first_publication_date
                .as_ref()
                .map(|d| format_date(d, &config.date_format)),
            datetime: post.first_publication_date.as_ref().map(date_xml),
            reading_time: estimator.estimate(&post.content),
            sections: post
                .content
                .iter()
                .map(|section| SectionView {
                    heading: section.heading.clone(),
                    html: richtext.render(&section.body),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub heading: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub title: String,
    pub href: String,
}

impl NavLink {
    pub fn new(config: &SiteConfig, entry: &NavigationEntry) -> Self {
        Self {
            title: entry.title.clone(),
            href: post_url(config, &entry.uid),
        }
    }
}
