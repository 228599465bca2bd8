//! In-memory TTL + LRU cache (MODULE E), grounded on
//! `original_source/.../infrastructure/cache/in_memory_cache.py`. The
//! Python original keeps an `OrderedDict` and calls `move_to_end`; we
//! reproduce that with a `Vec<String>` tracking recency order alongside a
//! `HashMap` for O(1) lookup, since the teacher repo pulls in no
//! linked-hashmap crate to model this on.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::Mutex;

#[derive(Clone)]
struct Entry {
    value: Value,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub max_size: usize,
}

impl CacheStats {
    /// Fraction in `[0, 1]`; 0 when no accesses have occurred yet. The
    /// presentation layer scales this by 100 for `hit_rate_percent` — see
    /// DESIGN.md's Open Questions entry on this exact discrepancy.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct Inner {
    entries: HashMap<String, Entry>,
    /// Recency order, least-recently-used first.
    order: Vec<String>,
    hits: u64,
    misses: u64,
}

pub struct InMemoryCache {
    max_size: usize,
    default_ttl: Duration,
    inner: Mutex<Inner>,
}

impl InMemoryCache {
    pub fn new(max_size: usize, default_ttl_seconds: u64) -> Self {
        Self {
            max_size,
            default_ttl: Duration::from_secs(default_ttl_seconds),
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: Vec::new(),
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();
        let hit = match inner.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
            Some(_) => {
                inner.entries.remove(key);
                remove_from_order(&mut inner.order, key);
                None
            }
            None => None,
        };

        match &hit {
            Some(_) => {
                inner.hits += 1;
                touch(&mut inner.order, key);
            }
            None => {
                inner.misses += 1;
            }
        }
        hit
    }

    pub async fn set(&self, key: &str, value: Value, ttl_seconds: Option<u64>) {
        let mut inner = self.inner.lock().await;
        let ttl = ttl_seconds.map(Duration::from_secs).unwrap_or(self.default_ttl);
        let expires_at = Instant::now() + ttl;

        inner
            .entries
            .insert(key.to_string(), Entry { value, expires_at });
        touch(&mut inner.order, key);

        while inner.entries.len() > self.max_size {
            if let Some(lru_key) = inner.order.first().cloned() {
                inner.order.remove(0);
                inner.entries.remove(&lru_key);
            } else {
                break;
            }
        }
    }

    pub async fn delete(&self, key: &str) -> bool {
        let mut inner = self.inner.lock().await;
        let removed = inner.entries.remove(key).is_some();
        if removed {
            remove_from_order(&mut inner.order, key);
        }
        removed
    }

    pub async fn exists(&self, key: &str) -> bool {
        let inner = self.inner.lock().await;
        match inner.entries.get(key) {
            Some(entry) => !entry.is_expired(Instant::now()),
            None => false,
        }
    }

    /// Clears all entries, returning the count removed. Hit/miss counters
    /// are deliberately **not** reset (spec §4.4, §8).
    pub async fn clear(&self) -> usize {
        let mut inner = self.inner.lock().await;
        let count = inner.entries.len();
        inner.entries.clear();
        inner.order.clear();
        count
    }

    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().await;
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            size: inner.entries.len(),
            max_size: self.max_size,
        }
    }
}

fn touch(order: &mut Vec<String>, key: &str) {
    remove_from_order(order, key);
    order.push(key.to_string());
}

fn remove_from_order(order: &mut Vec<String>, key: &str) {
    if let Some(pos) = order.iter().position(|k| k == key) {
        order.remove(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn get_miss_then_set_then_hit() {
        let cache = InMemoryCache::new(10, 300);
        assert!(cache.get("a").await.is_none());
        cache.set("a", json!(1), None).await;
        assert_eq!(cache.get("a").await, Some(json!(1)));
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn ttl_zero_is_immediately_expired() {
        let cache = InMemoryCache::new(10, 300);
        cache.set("a", json!(1), Some(0)).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(cache.get("a").await.is_none());
    }

    #[tokio::test]
    async fn eviction_keeps_most_recently_set() {
        let cache = InMemoryCache::new(2, 300);
        cache.set("a", json!(1), None).await;
        cache.set("b", json!(2), None).await;
        cache.set("c", json!(3), None).await;
        assert!(cache.exists("a").await == false);
        assert!(cache.exists("b").await);
        assert!(cache.exists("c").await);
    }

    #[tokio::test]
    async fn get_promotes_to_most_recently_used() {
        let cache = InMemoryCache::new(2, 300);
        cache.set("a", json!(1), None).await;
        cache.set("b", json!(2), None).await;
        // touch "a" so "b" becomes LRU
        let _ = cache.get("a").await;
        cache.set("c", json!(3), None).await;
        assert!(cache.exists("a").await);
        assert!(!cache.exists("b").await);
        assert!(cache.exists("c").await);
    }

    #[tokio::test]
    async fn clear_does_not_reset_counters() {
        let cache = InMemoryCache::new(10, 300);
        cache.set("a", json!(1), None).await;
        let _ = cache.get("a").await;
        let _ = cache.get("missing").await;
        let removed = cache.clear().await;
        assert_eq!(removed, 1);
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 0);
    }

    #[tokio::test]
    async fn hit_rate_is_fraction_not_percentage() {
        let cache = InMemoryCache::new(10, 300);
        cache.set("a", json!(1), None).await;
        let _ = cache.get("a").await;
        let _ = cache.get("a").await;
        let _ = cache.get("missing").await;
        let stats = cache.stats().await;
        assert!((stats.hit_rate() - (2.0 / 3.0)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn delete_reports_whether_removed() {
        let cache = InMemoryCache::new(10, 300);
        cache.set("a", json!(1), None).await;
        assert!(cache.delete("a").await);
        assert!(!cache.delete("a").await);
    }
}
