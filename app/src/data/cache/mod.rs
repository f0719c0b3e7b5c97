//! In-process fetch cache
//!
//! Memoizes complete fetch results by their parameters. Entries never expire;
//! callers bypass or invalidate explicitly.

mod key;

pub use key::CacheKey;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use ticketlens_tracker::ProjectFetch;

use crate::core::config::CacheConfig;

/// Result of fetching every tracked project once, in configured order
#[derive(Debug)]
pub struct FetchSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub projects: Vec<ProjectFetch>,
}

impl FetchSnapshot {
    pub fn new(projects: Vec<ProjectFetch>) -> Self {
        Self {
            fetched_at: Utc::now(),
            projects,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.projects.iter().all(|p| p.is_complete())
    }

    pub fn ticket_count(&self) -> usize {
        self.projects.iter().map(|p| p.tickets.len()).sum()
    }
}

pub struct FetchCache {
    cache: Cache<String, Arc<FetchSnapshot>>,
}

impl std::fmt::Debug for FetchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl FetchCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            cache: Cache::builder().max_capacity(config.max_entries).build(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<FetchSnapshot>> {
        let hit = self.cache.get(key).await;
        tracing::trace!(key, hit = hit.is_some(), "Fetch cache lookup");
        hit
    }

    /// Store a snapshot. Incomplete snapshots are not memoized.
    pub async fn insert(&self, key: String, snapshot: Arc<FetchSnapshot>) -> bool {
        if !snapshot.is_complete() {
            tracing::debug!(key = %key, "Not caching incomplete fetch");
            return false;
        }
        self.cache.insert(key, snapshot).await;
        true
    }

    pub async fn invalidate(&self, key: &str) {
        tracing::debug!(key, "Invalidating fetch cache entry");
        self.cache.invalidate(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketlens_tracker::{FetchError, RawTicket};

    fn project(name: &str, keys: &[&str], error: Option<FetchError>) -> ProjectFetch {
        ProjectFetch {
            project: name.to_string(),
            tickets: keys
                .iter()
                .map(|k| RawTicket {
                    key: k.to_string(),
                    fields: Default::default(),
                })
                .collect(),
            pages: 1,
            error,
        }
    }

    fn cache() -> FetchCache {
        FetchCache::new(&CacheConfig { max_entries: 4 })
    }

    #[test]
    fn test_snapshot_completeness() {
        let ok = FetchSnapshot::new(vec![project("TDS", &["TDS-1"], None)]);
        assert!(ok.is_complete());
        assert_eq!(ok.ticket_count(), 1);

        let partial = FetchSnapshot::new(vec![
            project("TDS", &["TDS-1"], None),
            project("INT", &["INT-1", "INT-2"], Some(FetchError::http_status(500, "boom"))),
        ]);
        assert!(!partial.is_complete());
        assert_eq!(partial.ticket_count(), 3);
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = cache();
        assert!(cache.get("k").await.is_none());

        let snapshot = Arc::new(FetchSnapshot::new(vec![project("TDS", &["TDS-1"], None)]));
        assert!(cache.insert("k".to_string(), snapshot.clone()).await);

        let hit = cache.get("k").await.unwrap();
        assert!(Arc::ptr_eq(&hit, &snapshot));
    }

    #[tokio::test]
    async fn test_incomplete_not_cached() {
        let cache = cache();
        let snapshot = Arc::new(FetchSnapshot::new(vec![project(
            "INT",
            &[],
            Some(FetchError::MalformedResponse("bad".to_string())),
        )]));
        assert!(!cache.insert("k".to_string(), snapshot).await);
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = cache();
        let snapshot = Arc::new(FetchSnapshot::new(vec![project("TDS", &[], None)]));
        cache.insert("a".to_string(), snapshot.clone()).await;
        cache.insert("b".to_string(), snapshot).await;

        cache.invalidate("a").await;
        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_some());
    }
}
