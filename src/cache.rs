//! In-memory response cache with a fixed time-to-live.
//!
//! Entries are whole JSON envelopes, replaced on write. Expired entries are
//! dropped when read and by a periodic sweep. Concurrent misses for the same
//! key may both hit the provider; the last write wins.

use dashmap::DashMap;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use url::form_urlencoded;

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

pub type QueryParams = BTreeMap<String, String>;

#[derive(Clone, Debug)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: Option<usize>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, max_entries: Option<usize>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > Instant::now() {
                tracing::debug!(cache_key = %key, "Cache hit");
                return Some(entry.value.clone());
            }
            // read guard must go before remove, same shard
            drop(entry);
            self.entries
                .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        }
        tracing::debug!(cache_key = %key, "Cache miss");
        None
    }

    pub fn set(&self, key: String, value: Value) {
        if let Some(max) = self.max_entries {
            if !self.entries.contains_key(&key) && self.entries.len() >= max {
                self.make_room(max);
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Number of stored entries, expired ones included until they are purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    fn make_room(&self, max: usize) {
        self.purge_expired();
        while self.entries.len() >= max {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().expires_at)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    tracing::debug!(cache_key = %key, "Evicting entry closest to expiry");
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

/// Purges expired entries every `every`, starting one period after the call.
/// Unread keys would otherwise stay in the map for the life of the process.
pub fn spawn_sweeper(cache: Arc<ResponseCache>, every: Duration) -> JoinHandle<()> {
    let every = every.max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = time::interval(every);
        // the first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            let purged = cache.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, remaining = cache.len(), "Swept expired cache entries");
            }
        }
    })
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, None)
    }
}

/// Builds a cache key from the resource name, its path segments and the
/// query parameters. Parameters are held in a `BTreeMap`, so the key does not
/// depend on the order in which they were supplied.
#[derive(Debug, Clone)]
pub struct CacheKey {
    resource: &'static str,
    segments: Vec<String>,
    params: QueryParams,
}

impl CacheKey {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            segments: Vec::new(),
            params: QueryParams::new(),
        }
    }

    pub fn segment(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    pub fn params<'a>(
        mut self,
        params: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Self {
        for (name, value) in params {
            self.params.insert(name.clone(), value.clone());
        }
        self
    }

    /// Segments and parameters are form-encoded, so a `:`, `?`, `&` or `=`
    /// inside a value never reads as a separator.
    pub fn build(&self) -> String {
        let mut key = String::from(self.resource);
        for segment in &self.segments {
            key.push(':');
            key.extend(form_urlencoded::byte_serialize(segment.as_bytes()));
        }
        if !self.params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.params)
                .finish();
            key.push('?');
            key.push_str(&query);
        }
        key
    }
}
