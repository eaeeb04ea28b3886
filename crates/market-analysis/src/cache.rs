//! Analysis Cache
//!
//! Short-lived, per-asset snapshot cache. Entries are replaced whole, failed
//! fetches are never stored, and concurrent requests for the same asset wait
//! on a single in-flight fetch.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

use crate::error::Result;
use crate::model::{AssetId, MarketSnapshot};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
struct CacheEntry {
    snapshot: Arc<MarketSnapshot>,
    fetched_at: Instant,
}

/// Time-boxed snapshot cache keyed by asset.
///
/// Grows with the number of distinct assets requested; there is no eviction.
pub struct AnalysisCache {
    ttl: Duration,
    entries: RwLock<HashMap<AssetId, CacheEntry>>,
    fetch_locks: Mutex<HashMap<AssetId, Arc<Mutex<()>>>>,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl AnalysisCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            fetch_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached snapshot if younger than the TTL
    pub async fn get(&self, asset: &AssetId) -> Option<Arc<MarketSnapshot>> {
        let entries = self.entries.read().await;
        entries
            .get(asset)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.snapshot))
    }

    /// Return the fresh entry for `asset`, or run `fetch` and store its result.
    ///
    /// Errors from `fetch` are returned as-is and leave the cache untouched.
    pub async fn get_or_fetch<F, Fut>(&self, asset: &AssetId, fetch: F) -> Result<Arc<MarketSnapshot>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<MarketSnapshot>>,
    {
        if let Some(snapshot) = self.get(asset).await {
            debug!(%asset, "cache hit");
            return Ok(snapshot);
        }

        let lock = {
            let mut locks = self.fetch_locks.lock().await;
            Arc::clone(locks.entry(asset.clone()).or_default())
        };
        let _in_flight = lock.lock().await;

        // Another caller may have filled the entry while we waited.
        if let Some(snapshot) = self.get(asset).await {
            debug!(%asset, "cache filled by concurrent fetch");
            return Ok(snapshot);
        }

        debug!(%asset, "cache miss, fetching");
        let snapshot = Arc::new(fetch().await?);
        self.insert(asset.clone(), Arc::clone(&snapshot)).await;
        Ok(snapshot)
    }

    async fn insert(&self, asset: AssetId, snapshot: Arc<MarketSnapshot>) {
        let entry = CacheEntry {
            snapshot,
            fetched_at: Instant::now(),
        };
        self.entries.write().await.insert(asset, entry);
    }

    /// Drop one entry so the next request refetches
    pub async fn invalidate(&self, asset: &AssetId) -> bool {
        self.entries.write().await.remove(asset).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, stale ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
