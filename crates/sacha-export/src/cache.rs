// SPDX-License-Identifier: MIT
//
// Conversion cache — bounded memo of tokenized content.
//
// Eviction is FIFO, not LRU: when capacity is exceeded the entry inserted
// earliest is removed, regardless of how recently it was queried. This is
// the documented contract (consumers have been told a hit does not extend an
// entry's lifetime), so do not "upgrade" it to LRU without flagging the
// semantic change.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::tokenize::{tokenize, ContentBlock};

/// Reference capacity used by the production exporter.
pub const DEFAULT_CAPACITY: usize = 50;

struct CacheInner {
    /// Raw content string -> memoized block sequence. Keys are the full
    /// input strings; for very large inputs this trades memory for the
    /// simplicity of exact-content keying.
    entries: HashMap<String, Arc<Vec<ContentBlock>>>,
    /// Keys in insertion order; front is the eviction candidate.
    insertion_order: VecDeque<String>,
}

/// Process-wide tokenization cache.
///
/// Constructed once at startup and passed by handle into the orchestrator —
/// there is no implicit singleton. Writes are serialized by an interior
/// lock, satisfying the single-writer requirement for concurrent callers.
pub struct ConversionCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl ConversionCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                insertion_order: VecDeque::new(),
            }),
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the memoized block sequence for `content`, tokenizing on a
    /// miss. On a miss the result is stored under the raw content string; if
    /// the store then exceeds capacity, the earliest-inserted entry is
    /// evicted.
    pub fn get_or_compute(&self, content: &str) -> Arc<Vec<ContentBlock>> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");

        if let Some(blocks) = inner.entries.get(content) {
            trace!(len = content.len(), "conversion cache hit");
            return Arc::clone(blocks);
        }

        let blocks = Arc::new(tokenize(content));
        inner.entries.insert(content.to_string(), Arc::clone(&blocks));
        inner.insertion_order.push_back(content.to_string());

        if inner.entries.len() > self.capacity {
            if let Some(oldest) = inner.insertion_order.pop_front() {
                inner.entries.remove(&oldest);
                debug!(key_len = oldest.len(), "evicted oldest cache entry");
            }
        }

        blocks
    }

    /// Whether `content` currently has a memoized entry. Does not count as
    /// an access for any eviction purpose (there is none — FIFO).
    pub fn contains(&self, content: &str) -> bool {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .entries
            .contains_key(content)
    }
}

impl Default for ConversionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_returns_same_blocks() {
        let cache = ConversionCache::new(4);
        let a = cache.get_or_compute("**Title**\n\nbody");
        let b = cache.get_or_compute("**Title**\n\nbody");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn fifo_eviction_at_capacity() {
        let cache = ConversionCache::new(50);
        for i in 0..51 {
            cache.get_or_compute(&format!("content {i}"));
        }
        assert_eq!(cache.len(), 50);
        // The very first inserted key is gone; the 50 most recently
        // *inserted* remain.
        assert!(!cache.contains("content 0"));
        for i in 1..51 {
            assert!(cache.contains(&format!("content {i}")));
        }
    }

    #[test]
    fn query_does_not_refresh_insertion_order() {
        let cache = ConversionCache::new(2);
        cache.get_or_compute("first");
        cache.get_or_compute("second");

        // Re-query "first" so it is the most recently used entry...
        cache.get_or_compute("first");

        // ...yet a third insert still evicts it: FIFO, not LRU.
        cache.get_or_compute("third");
        assert!(!cache.contains("first"));
        assert!(cache.contains("second"));
        assert!(cache.contains("third"));
    }

    #[test]
    fn capacity_is_clamped_to_one() {
        let cache = ConversionCache::new(0);
        cache.get_or_compute("a");
        cache.get_or_compute("b");
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("b"));
    }
}
