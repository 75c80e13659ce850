//! Bounded LRU cache of resolved principals.
//!
//! Keys are principal names. Values are either a resolved principal or a
//! negative marker recording that the name did not resolve. Negative markers
//! are only stored when the cache was built with negative caching enabled.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::types::Principal;

/// A cached resolution result.
#[derive(Debug, Clone)]
pub enum CacheEntry {
    Principal(Arc<Principal>),
    Negative,
}

impl CacheEntry {
    pub fn principal(&self) -> Option<Arc<Principal>> {
        match self {
            CacheEntry::Principal(principal) => Some(Arc::clone(principal)),
            CacheEntry::Negative => None,
        }
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CacheStats {
    pub capacity: usize,
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe principal cache. Cloning the surrounding `Arc` shares it.
pub struct PrincipalCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    capacity: NonZeroUsize,
    include_negative: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PrincipalCache {
    pub fn new(capacity: NonZeroUsize, include_negative: bool) -> Self {
        PrincipalCache {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity,
            include_negative,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up `name`, marking it most recently used on a hit.
    pub fn get(&self, name: &str) -> Option<CacheEntry> {
        let entry = self.entries.lock().get(name).cloned();
        match entry {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        entry
    }

    /// Insert or overwrite `name`, evicting the least recently used entry when full.
    ///
    /// Negative markers are dropped unless negative caching is enabled.
    pub fn put(&self, name: &str, entry: CacheEntry) {
        if matches!(entry, CacheEntry::Negative) && !self.include_negative {
            return;
        }
        if let Some((evicted, _)) = self.entries.lock().push(name.to_string(), entry) {
            if evicted != name {
                debug!(event = "Cache", phase = "Evict", name = evicted);
            }
        }
    }

    /// Whether `name` is cached, without touching its recency.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().contains(name)
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn includes_negative(&self) -> bool {
        self.include_negative
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            capacity: self.capacity(),
            size: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for PrincipalCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrincipalCache")
            .field("capacity", &self.capacity)
            .field("include_negative", &self.include_negative)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrincipalKind;
    use std::thread;

    fn cache(capacity: usize, include_negative: bool) -> PrincipalCache {
        PrincipalCache::new(NonZeroUsize::new(capacity).unwrap(), include_negative)
    }

    fn entry(name: &str) -> CacheEntry {
        CacheEntry::Principal(Arc::new(Principal::detached(name, PrincipalKind::User)))
    }

    #[test]
    fn test_get_returns_same_instance() {
        let cache = cache(4, false);
        let alice = Arc::new(Principal::detached("alice", PrincipalKind::User));
        cache.put("alice", CacheEntry::Principal(Arc::clone(&alice)));

        let cached = cache.get("alice").and_then(|e| e.principal()).unwrap();
        assert!(Arc::ptr_eq(&alice, &cached));
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = cache(3, false);
        cache.put("a", entry("a"));
        cache.put("b", entry("b"));
        cache.put("c", entry("c"));

        // Touch "a" so "b" becomes the least recently used.
        assert!(cache.get("a").is_some());
        cache.put("d", entry("d"));

        assert_eq!(cache.len(), 3);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert!(cache.contains("d"));
    }

    #[test]
    fn test_k_plus_one_inserts_evict_exactly_first() {
        let k = 5;
        let cache = cache(k, false);
        for i in 0..=k {
            cache.put(&format!("p{i}"), entry(&format!("p{i}")));
        }
        assert_eq!(cache.len(), k);
        assert!(!cache.contains("p0"));
        for i in 1..=k {
            assert!(cache.contains(&format!("p{i}")));
        }
    }

    #[test]
    fn test_negative_entries_dropped_when_disabled() {
        let cache = cache(4, false);
        cache.put("ghost", CacheEntry::Negative);
        assert!(cache.get("ghost").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_negative_entries_kept_when_enabled() {
        let cache = cache(4, true);
        cache.put("ghost", CacheEntry::Negative);
        assert!(matches!(cache.get("ghost"), Some(CacheEntry::Negative)));
    }

    #[test]
    fn test_overwrite_keeps_single_key() {
        let cache = cache(4, true);
        cache.put("alice", CacheEntry::Negative);
        cache.put("alice", entry("alice"));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("alice").and_then(|e| e.principal()).is_some());
    }

    #[test]
    fn test_clear() {
        let cache = cache(4, false);
        cache.put("alice", entry("alice"));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 4);
    }

    #[test]
    fn test_stats() {
        let cache = cache(2, false);
        cache.put("alice", entry("alice"));
        cache.get("alice");
        cache.get("bob");

        let stats = cache.stats();
        assert_eq!(stats, CacheStats { capacity: 2, size: 1, hits: 1, misses: 1 });
        assert_eq!(stats.hit_ratio(), 0.5);
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(cache(64, true));
        let mut handles = vec![];

        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..200 {
                    let name = format!("p{}", (t * 7 + i) % 100);
                    if i % 3 == 0 {
                        cache.put(&name, CacheEntry::Negative);
                    } else {
                        cache.put(&name, entry(&name));
                    }
                    cache.get(&name);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 64);
    }
}
