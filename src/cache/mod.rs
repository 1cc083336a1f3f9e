use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use crate::core::types::{Idea, IdeaId};

struct CacheEntry {
    idea: Idea,
    cached_at: Instant,
}

/// TTL cache over point lookups.
///
/// The LRU capacity bounds memory; the source this replaces let expired
/// entries linger forever. Expired entries are also evicted when touched.
pub struct IdeaCache {
    entries: Mutex<LruCache<IdeaId, CacheEntry>>,
    ttl: Duration,
    capacity: usize,
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
}

impl IdeaCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap();
        IdeaCache {
            entries: Mutex::new(LruCache::new(cap)),
            ttl,
            capacity: capacity.max(1),
            hit_count: AtomicUsize::new(0),
            miss_count: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, id: &IdeaId) -> Option<Idea> {
        let mut entries = self.entries.lock();
        match entries.get(id) {
            Some(entry) if entry.cached_at.elapsed() < self.ttl => {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                Some(entry.idea.clone())
            }
            Some(_) => {
                entries.pop(id);
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, idea: Idea) {
        let mut entries = self.entries.lock();
        entries.put(
            idea.id,
            CacheEntry {
                idea,
                cached_at: Instant::now(),
            },
        );
    }

    /// Drop the entry for one id. Called synchronously by every mutation
    /// before the write is acknowledged.
    pub fn invalidate(&self, id: &IdeaId) {
        self.entries.lock().pop(id);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            size: self.entries.lock().len(),
            capacity: self.capacity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hit_count: usize,
    pub miss_count: usize,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}
