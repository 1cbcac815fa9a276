//! Time-to-live cache for remote lookups.
//!
//! Entries record when they were last refreshed; staleness is a pure check
//! against a caller-supplied clock so it can be tested without sleeping.
//! Concurrent refreshes of one key are allowed and the last writer wins.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub data: V,
    pub refreshed_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn new(data: V, refreshed_at: DateTime<Utc>) -> Self {
        Self { data, refreshed_at }
    }

    pub fn is_stale(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.refreshed_at >= ttl
    }
}

#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: TimeDelta,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Returns the cached value for `key` if it is still fresh at `now`.
    pub async fn get_fresh(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_stale(now, self.ttl))
            .map(|entry| entry.data.clone())
    }

    pub async fn insert(&self, key: K, data: V, now: DateTime<Utc>) {
        self.entries.write().await.insert(key, CacheEntry::new(data, now));
    }

    pub async fn invalidate(&self, key: &K) {
        self.entries.write().await.remove(key);
    }

    /// Returns a fresh cached value, or runs `refresh` and stores its result.
    ///
    /// `force` skips the freshness check. Refresh errors are returned as-is and
    /// leave any previous entry untouched.
    pub async fn get_or_refresh<F, Fut, E>(&self, key: K, force: bool, refresh: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !force {
            if let Some(data) = self.get_fresh(&key, Utc::now()).await {
                return Ok(data);
            }
        }

        debug!("Refreshing cache entry {:?}", key);
        let data = refresh().await?;
        self.insert(key, data.clone(), Utc::now()).await;

        Ok(data)
    }
}
