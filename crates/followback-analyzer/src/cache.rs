//! Result Cache: TTL-bounded, capacity-bounded memoization keyed by
//! normalized username.

use std::num::NonZeroUsize;
use std::time::Duration;

use followback_core::{AnalysisResult, Username};
use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;

struct CacheEntry {
    value: AnalysisResult,
    stored_at: Instant,
}

/// Entries expire lazily: a lookup at or past `ttl` evicts and reports a
/// miss. When full, the least recently used entry is dropped.
pub struct ResultCache {
    ttl: Duration,
    entries: Mutex<LruCache<String, CacheEntry>>,
}

impl ResultCache {
    /// A `capacity` of zero is treated as one.
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub async fn get(&self, key: &Username) -> Option<AnalysisResult> {
        let mut entries = self.entries.lock().await;
        let stored_at = entries.peek(key.as_str())?.stored_at;
        if stored_at.elapsed() >= self.ttl {
            entries.pop(key.as_str());
            tracing::debug!(username = %key, "cache entry expired");
            return None;
        }
        entries.get(key.as_str()).map(|e| e.value.clone())
    }

    pub async fn put(&self, key: &Username, value: AnalysisResult) {
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
        };
        let mut entries = self.entries.lock().await;
        if let Some((evicted, _)) = entries.push(key.as_str().to_owned(), entry) {
            if evicted != key.as_str() {
                tracing::debug!(evicted = %evicted, "cache full, evicted least recently used entry");
            }
        }
    }

    /// Entries currently held, including expired ones not yet looked up.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
