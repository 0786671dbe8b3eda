//! A small hand-rolled LRU cache, keyed by `(operation, input fingerprint, parameters)`.
//!
//! Hand-rolled rather than pulled from a crate: nothing else in this codebase's dependency
//! stack reaches for an LRU implementation, and a `HashMap` + `VecDeque` access-order list is
//! little enough code to keep in-tree.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// The cache key: which operation produced the value, over which input (by fingerprint), with
/// which string-encoded parameters (e.g. a strategy name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub operation: &'static str,
    pub fingerprint: u64,
    pub parameters: String,
}

impl CacheKey {
    pub fn new(operation: &'static str, fingerprint: u64, parameters: impl Into<String>) -> Self {
        Self {
            operation,
            fingerprint,
            parameters: parameters.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

struct Inner<V> {
    capacity: usize,
    map: HashMap<CacheKey, V>,
    /// Most-recently-used key at the back.
    order: VecDeque<CacheKey>,
    hits: u64,
    misses: u64,
}

impl<V> Inner<V> {
    fn touch(&mut self, key: &CacheKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            let key = self.order.remove(pos).unwrap();
            self.order.push_back(key);
        }
    }

    fn evict_if_needed(&mut self) {
        while self.map.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            } else {
                break;
            }
        }
    }
}

/// A `Mutex`-guarded LRU result cache, shared by the optimization and balancing engines.
/// The mutex is held only during lookup/insert, never during the computation that produced
/// the value being inserted.
pub struct ResultCache<V> {
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                capacity: capacity.max(1),
                map: HashMap::new(),
                order: VecDeque::new(),
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        if let Some(value) = inner.map.get(key).cloned() {
            inner.touch(key);
            inner.hits += 1;
            Some(value)
        } else {
            inner.misses += 1;
            None
        }
    }

    pub fn insert(&self, key: CacheKey, value: V) {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        if inner.map.insert(key.clone(), value).is_none() {
            inner.order.push_back(key);
        } else {
            inner.touch(&key);
        }
        inner.evict_if_needed();
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        inner.map.clear();
        inner.order.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    pub fn set_capacity(&self, capacity: usize) {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        inner.capacity = capacity.max(1);
        inner.evict_if_needed();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().expect("cache mutex poisoned");
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            size: inner.map.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used() {
        let cache: ResultCache<u32> = ResultCache::new(2);
        let a = CacheKey::new("op", 1, "");
        let b = CacheKey::new("op", 2, "");
        let c = CacheKey::new("op", 3, "");
        cache.insert(a.clone(), 1);
        cache.insert(b.clone(), 2);
        cache.get(&a);
        cache.insert(c.clone(), 3);
        assert!(cache.get(&a).is_some());
        assert!(cache.get(&b).is_none());
        assert!(cache.get(&c).is_some());
    }

    #[test]
    fn tracks_hit_miss_stats() {
        let cache: ResultCache<u32> = ResultCache::new(4);
        let key = CacheKey::new("op", 1, "");
        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), 42);
        assert_eq!(cache.get(&key), Some(42));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }
}
