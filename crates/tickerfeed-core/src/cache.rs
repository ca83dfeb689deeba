//! In-memory TTL cache for normalized responses.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Default lifetime of a cached response.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(1800);

/// How a single call interacts with the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Serve a fresh entry if present; otherwise fetch and store. (Default)
    #[default]
    Use,
    /// Always fetch, then store the new value.
    Refresh,
    /// Always fetch; neither read nor write the cache.
    Bypass,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

/// Shared, cloneable cache. Entries expire purely by age; nothing is evicted
/// until it is replaced or [`CacheStore::clear_expired`] is called.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    entries: Arc<tokio::sync::RwLock<HashMap<K, CacheEntry<V>>>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl<K, V> Clone for CacheStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            hits: Arc::clone(&self.hits),
            misses: Arc::clone(&self.misses),
        }
    }
}

impl<K, V> Default for CacheStore<K, V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(tokio::sync::RwLock::new(HashMap::new())),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key` if it was stored less than `ttl` ago.
    pub async fn get(&self, key: &K, ttl: Duration) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < ttl)
            .map(|entry| entry.value.clone())
    }

    pub async fn put(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Read-through lookup.
    ///
    /// On a miss `fetch` runs with no lock held, and only an `Ok` value is
    /// stored. Two concurrent misses on one key both fetch; the later write
    /// wins.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: K,
        ttl: Duration,
        mode: CacheMode,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if mode == CacheMode::Use {
            if let Some(value) = self.get(&key, ttl).await {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(value);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = fetch().await?;
        if mode != CacheMode::Bypass {
            self.put(key, value.clone()).await;
        }
        Ok(value)
    }

    /// Drop entries older than `ttl`.
    pub async fn clear_expired(&self, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
