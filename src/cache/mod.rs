//! Revalidation cache
//!
//! Resolved pages are kept per slug and served for a fixed window. Once an
//! entry is older than the window it is still served, but reported as stale
//! so the caller can refresh it in the background. At most one refresh per
//! slug runs at a time.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

/// A cached value and when it was stored
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at: DateTime<Utc>,
}

/// Lookup result
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// Younger than the revalidation window
    Fresh(T),
    /// Older than the window; serve it and refresh
    Stale(T),
    /// Never resolved
    Miss,
}

impl<T> Lookup<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            Lookup::Fresh(v) | Lookup::Stale(v) => Some(v),
            Lookup::Miss => None,
        }
    }
}

/// Slug-keyed cache with a time-based revalidation window
#[derive(Debug)]
pub struct RevalidationCache<T> {
    window: Duration,
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    refreshing: Mutex<HashSet<String>>,
}

impl<T: Clone> RevalidationCache<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: RwLock::new(HashMap::new()),
            refreshing: Mutex::new(HashSet::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Look up `slug` as of `now`
    pub fn get_at(&self, slug: &str, now: DateTime<Utc>) -> Lookup<T> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(entry) = entries.get(slug) else {
            return Lookup::Miss;
        };

        let age = now
            .signed_duration_since(entry.stored_at)
            .to_std()
            .unwrap_or_default();
        if age < self.window {
            Lookup::Fresh(entry.value.clone())
        } else {
            Lookup::Stale(entry.value.clone())
        }
    }

    pub fn get(&self, slug: &str) -> Lookup<T> {
        self.get_at(slug, Utc::now())
    }

    /// Store `value` for `slug` as of `now`, replacing any previous entry
    pub fn insert_at(&self, slug: &str, value: T, now: DateTime<Utc>) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(
            slug.to_string(),
            CacheEntry {
                value,
                stored_at: now,
            },
        );
    }

    pub fn insert(&self, slug: &str, value: T) {
        self.insert_at(slug, value, Utc::now());
    }

    /// Claim the refresh of `slug`; false when one is already running
    pub fn begin_refresh(&self, slug: &str) -> bool {
        let mut refreshing = match self.refreshing.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        refreshing.insert(slug.to_string())
    }

    pub fn end_refresh(&self, slug: &str) {
        let mut refreshing = match self.refreshing.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        refreshing.remove(slug);
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
