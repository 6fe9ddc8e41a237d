//! Insight Cache
//!
//! Bounded cache of engine output keyed by dataset content hash. Entries are
//! evicted oldest-first once capacity is reached. The caller owns the cache
//! and decides when to invalidate; output is identical with or without it.

use std::collections::{HashMap, VecDeque};

use crate::insights::Insight;

/// Default number of cached datasets
pub const DEFAULT_CAPACITY: usize = 16;

/// Cache statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub invalidations: u64,
}

impl CacheStats {
    /// Cache hit rate (0.0 - 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
pub struct InsightCache {
    entries: HashMap<String, Vec<Insight>>,
    /// Insertion order, oldest at the front
    order: VecDeque<String>,
    capacity: usize,
    stats: CacheStats,
}

impl Default for InsightCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl InsightCache {
    /// Create a cache holding at most `capacity` datasets (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            stats: CacheStats::default(),
        }
    }

    pub fn get(&mut self, key: &str) -> Option<&[Insight]> {
        match self.entries.get(key) {
            Some(insights) => {
                self.stats.hits += 1;
                Some(insights.as_slice())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store insights for a dataset key, evicting the oldest entry when full
    pub fn insert(&mut self, key: String, insights: Vec<Insight>) {
        if self.entries.contains_key(&key) {
            self.entries.insert(key, insights);
            return;
        }

        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            self.stats.evictions += 1;
            tracing::debug!(key = %oldest, "Evicted cached insights");
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, insights);
    }

    /// Drop one entry; returns whether it was present
    pub fn invalidate(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.order.retain(|k| k != key);
            self.stats.invalidations += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        let dropped = self.entries.len() as u64;
        self.entries.clear();
        self.order.clear();
        self.stats.invalidations += dropped;
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
