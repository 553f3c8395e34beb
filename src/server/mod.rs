//! Page server with time-based revalidation
//!
//! Enumerated posts are rendered before the listener starts. Unknown slugs
//! are resolved on their first request (blocking fallback) and cached like
//! the rest. Pages older than the revalidation window keep being served
//! while a single background refresh replaces them.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cache::{Lookup, RevalidationCache};
use crate::content::ResolveError;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Server state
pub struct ServerState {
    blog: Blog,
    renderer: TemplateRenderer,
    cache: RevalidationCache<String>,
}

impl ServerState {
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            renderer: TemplateRenderer::new()?,
            cache: RevalidationCache::new(blog.config.revalidate_after()),
        })
    }

    /// Resolve and render one post page
    fn build_page(&self, slug: &str) -> Result<String> {
        let props = self.blog.static_props(slug)?;
        self.renderer.render_post(
            &self.blog.config,
            &props.props,
            self.blog.richtext.as_ref(),
        )
    }

    /// Render every enumerated path into the cache
    pub fn prerender(&self) -> Result<usize> {
        let paths = self.blog.static_paths()?;
        let mut count = 0;
        for slug in paths.slugs() {
            let html = self.build_page(slug)?;
            self.cache.insert(slug, html);
            count += 1;
        }
        Ok(count)
    }
}

/// Start the page server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState::new(blog)?);

    let prerender_state = state.clone();
    let count = tokio::task::spawn_blocking(move || prerender_state.prerender()).await??;
    tracing::info!("Pre-rendered {} posts", count);

    let app = router(state, blog);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<ServerState>, blog: &Blog) -> Router {
    Router::new()
        .route("/post/:slug", get(post_handler))
        .fallback_service(ServeDir::new(&blog.public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve a post page from the cache, resolving it when needed
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.cache.get(&slug) {
        Lookup::Fresh(html) => Html(html).into_response(),
        Lookup::Stale(html) => {
            if state.cache.begin_refresh(&slug) {
                tokio::spawn(refresh(state.clone(), slug));
            }
            Html(html).into_response()
        }
        Lookup::Miss => {
            tracing::info!("Resolving '{}' on first request", slug);
            match build_blocking(state.clone(), slug.clone()).await {
                Ok(html) => {
                    state.cache.insert(&slug, html.clone());
                    Html(html).into_response()
                }
                Err(e) => error_response(&slug, e),
            }
        }
    }
}

/// Re-resolve a stale page; the stale copy stays when this fails
async fn refresh(state: Arc<ServerState>, slug: String) {
    tracing::debug!("Revalidating '{}'", slug);
    match build_blocking(state.clone(), slug.clone()).await {
        Ok(html) => state.cache.insert(&slug, html),
        Err(e) => tracing::warn!("Failed to revalidate '{}': {:#}", slug, e),
    }
    state.cache.end_refresh(&slug);
}

async fn build_blocking(state: Arc<ServerState>, slug: String) -> Result<String> {
    tokio::task::spawn_blocking(move || state.build_page(&slug)).await?
}

fn error_response(slug: &str, err: anyhow::Error) -> Response {
    let not_found = err
        .downcast_ref::<ResolveError>()
        .map(|e| e.is_not_found())
        .unwrap_or(false);

    if not_found {
        tracing::debug!("Post '{}' not found", slug);
        (StatusCode::NOT_FOUND, "Not found").into_response()
    } else {
        tracing::error!("Failed to resolve '{}': {:#}", slug, err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::store::{ContentStore, MemoryStore, Projection, RawDocument, StoreError};
    use chrono::Utc;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Counts single-document fetches; fails them while `offline` is set
    struct CountingStore {
        inner: MemoryStore,
        fetches: AtomicUsize,
        offline: AtomicBool,
    }

    impl ContentStore for CountingStore {
        fn get_by_uid(&self, content_type: &str, uid: &str) -> Result<RawDocument, StoreError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.offline.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("store offline".to_string()));
            }
            self.inner.get_by_uid(content_type, uid)
        }

        fn list_corpus(
            &self,
            content_type: &str,
            projection: &Projection,
        ) -> Result<Vec<RawDocument>, StoreError> {
            self.inner.list_corpus(content_type, projection)
        }
    }

    fn state() -> (Arc<ServerState>, Arc<CountingStore>) {
        let store = Arc::new(CountingStore {
            inner: MemoryStore::new(vec![
                RawDocument::new("posts", "a").with_field("title", json!("A")),
                RawDocument::new("drafts", "b").with_field("title", json!("B")),
            ]),
            fetches: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        });
        let mut config = SiteConfig::default();
        config.store.post_type = "posts".to_string();
        let blog = Blog::with_store("/tmp/site", config, store.clone());
        (Arc::new(ServerState::new(&blog).unwrap()), store)
    }

    async fn get(state: &Arc<ServerState>, slug: &str) -> StatusCode {
        post_handler(State(state.clone()), Path(slug.to_string()))
            .await
            .status()
    }

    #[test]
    fn test_prerender_fills_cache() {
        let (state, store) = state();
        assert_eq!(state.prerender().unwrap(), 1);
        assert!(matches!(state.cache.get("a"), Lookup::Fresh(_)));
        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_first_request_resolves_then_caches() {
        let (state, store) = state();
        assert_eq!(get(&state, "a").await, StatusCode::OK);
        assert_eq!(get(&state, "a").await, StatusCode::OK);
        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let (state, _) = state();
        assert_eq!(get(&state, "b").await, StatusCode::NOT_FOUND);
        assert!(matches!(state.cache.get("b"), Lookup::Miss));
    }

    #[tokio::test]
    async fn test_stale_page_is_served_and_refreshed() {
        let (state, store) = state();
        let long_ago = Utc::now() - chrono::Duration::hours(1);
        state.cache.insert_at("a", "old page".to_string(), long_ago);

        assert_eq!(get(&state, "a").await, StatusCode::OK);

        // Wait for the background refresh to land
        for _ in 0..100 {
            if matches!(state.cache.get("a"), Lookup::Fresh(_)) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        match state.cache.get("a") {
            Lookup::Fresh(html) => assert!(html.contains("<h1>A</h1>")),
            other => panic!("expected a fresh page, got {:?}", other),
        }
        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let (state, store) = state();
        store.offline.store(true, Ordering::SeqCst);

        assert_eq!(get(&state, "a").await, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(state.cache.get("a"), Lookup::Miss));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_stale_page() {
        let (state, store) = state();
        store.offline.store(true, Ordering::SeqCst);
        let long_ago = Utc::now() - chrono::Duration::hours(1);
        state.cache.insert_at("a", "old page".to_string(), long_ago);

        let response = post_handler(State(state.clone()), Path("a".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"old page");

        // The refresh releases its claim once it has failed
        let mut released = false;
        for _ in 0..100 {
            if state.cache.begin_refresh("a") {
                released = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(released, "refresh claim was never released");
        state.cache.end_refresh("a");

        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(state.cache.get("a"), Lookup::Stale("old page".to_string()));

        // Back online, the next request refreshes again
        store.offline.store(false, Ordering::SeqCst);
        assert_eq!(get(&state, "a").await, StatusCode::OK);
        for _ in 0..100 {
            if matches!(state.cache.get("a"), Lookup::Fresh(_)) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(matches!(state.cache.get("a"), Lookup::Fresh(_)));
    }
}
