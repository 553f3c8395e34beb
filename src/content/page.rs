//! Page-level resolution: post, corpus listing and navigation together

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::navigation::SiblingNavigator;
use super::resolver::{ContentResolver, ResolveError};
use super::PostPage;
use crate::store::{ContentStore, Projection};

/// Resolved page data plus how long it may be served
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticProps {
    pub props: PostPage,
    /// Revalidation window in seconds
    #[serde(serialize_with = "as_secs")]
    pub revalidate: Duration,
}

fn as_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_secs())
}

/// Resolves everything the post page renders from
#[derive(Clone)]
pub struct PageResolver {
    resolver: ContentResolver,
    store: Arc<dyn ContentStore>,
    corpus_type: String,
    revalidate: Duration,
}

impl PageResolver {
    pub fn new(
        store: Arc<dyn ContentStore>,
        post_type: &str,
        corpus_type: &str,
        revalidate: Duration,
    ) -> Self {
        Self {
            resolver: ContentResolver::new(store.clone(), post_type),
            store,
            corpus_type: corpus_type.to_string(),
            revalidate,
        }
    }

    /// Resolve the page for `slug`
    pub fn static_props(&self, slug: &str) -> Result<StaticProps, ResolveError> {
        let post = self.resolver.resolve(slug)?;

        let projection =
            Projection::for_type(&self.corpus_type, &["title", "subtitle", "author"]);
        let corpus = self.store.list_corpus(&self.corpus_type, &projection)?;
        let listing = SiblingNavigator::listing(&corpus);
        let navigation_items = SiblingNavigator::navigate(&listing, &post.uid);

        Ok(StaticProps {
            props: PostPage {
                post,
                navigation_items,
            },
            revalidate: self.revalidate,
        })
    }
}
