//! Bounded in-memory result cache with time-based retention.
//!
//! One policy ([`CachePolicy`]) is shared by every cacheable provider read: lyrics by
//! `(artist, title)` and catalog artist/album lookups by id. Entries expire after the
//! retention window; once the cache is full the least recently used entry is evicted.
//!
//! The cache is cheap to clone (`Arc` inside) and safe to share across concurrent requests.
//! Locks are never held across an `.await`, so two overlapping misses for the same key may
//! both hit the provider; the last insert wins.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Retention and capacity shared by all provider caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            capacity: 1000,
        }
    }
}

struct Entry<V> {
    value: V,
    inserted: Instant,
    last_used: u64,
}

struct Inner<K, V> {
    entries: HashMap<K, Entry<V>>,
    tick: u64,
}

/// Thread-safe TTL + LRU cache.
pub struct TtlCache<K, V> {
    policy: CachePolicy,
    inner: Arc<Mutex<Inner<K, V>>>,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
            })),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Return the cached value or run `fetch` and cache its `Ok` result.
    ///
    /// Errors are not cached.
    pub async fn get_or_try_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;

        let expired = match inner.entries.get_mut(key) {
            None => return None,
            Some(entry) if now.duration_since(entry.inserted) >= self.policy.ttl => true,
            Some(entry) => {
                entry.last_used = tick;
                return Some(entry.value.clone());
            }
        };

        if expired {
            inner.entries.remove(key);
        }
        None
    }

    fn insert_at(&self, key: K, value: V, now: Instant) {
        if self.policy.capacity == 0 {
            return;
        }

        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.policy.capacity {
            let ttl = self.policy.ttl;
            inner
                .entries
                .retain(|_, entry| now.duration_since(entry.inserted) < ttl);

            if inner.entries.len() >= self.policy.capacity {
                let lru = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.last_used)
                    .map(|(k, _)| k.clone());
                if let Some(lru) = lru {
                    inner.entries.remove(&lru);
                }
            }
        }

        inner.entries.insert(
            key,
            Entry {
                value,
                inserted: now,
                last_used: tick,
            },
        );
    }
}
