//! Request-keyed result cache with in-flight deduplication.
//!
//! Entries nobody has looked up or stored within the idle window are dropped
//! the next time a result is stored, so a long session of distinct searches
//! does not grow the cache without bound.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

/// Result of looking a key up in the cache.
#[derive(Debug)]
pub enum Lookup<V> {
    /// Cached and younger than the staleness window; no fetch needed.
    Fresh(Arc<V>),
    /// Cached but old; show it and refetch in the background.
    Stale(Arc<V>),
    Missing,
}

#[derive(Debug)]
struct Entry<V> {
    value: Arc<V>,
    fetched_at: Instant,
    last_used: Instant,
}

#[derive(Debug)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    in_flight: HashSet<K>,
    stale_after: Duration,
    gc_after: Duration,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// `stale_after` of zero treats every entry as stale. Entries idle for
    /// `gc_after` or longer are evicted.
    pub fn new(stale_after: Duration, gc_after: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashSet::new(),
            stale_after,
            gc_after,
        }
    }

    /// Looks `key` up and marks its entry as used at `now`.
    pub fn lookup(&mut self, key: &K, now: Instant) -> Lookup<V> {
        let Some(entry) = self.entries.get_mut(key) else {
            return Lookup::Missing;
        };
        entry.last_used = now;
        let value = Arc::clone(&entry.value);
        if now.saturating_duration_since(entry.fetched_at) < self.stale_after {
            Lookup::Fresh(value)
        } else {
            Lookup::Stale(value)
        }
    }

    /// Marks `key` as being fetched. Returns false if a fetch for it is
    /// already outstanding, in which case the caller must not issue another.
    pub fn begin_fetch(&mut self, key: &K) -> bool {
        self.in_flight.insert(key.clone())
    }

    /// Stores a successful result, clears the in-flight mark and evicts idle
    /// entries.
    pub fn complete(&mut self, key: &K, value: V, now: Instant) -> Arc<V> {
        self.in_flight.remove(key);
        let value = Arc::new(value);
        self.entries.insert(
            key.clone(),
            Entry {
                value: Arc::clone(&value),
                fetched_at: now,
                last_used: now,
            },
        );
        self.evict_idle(key, now);
        value
    }

    /// Clears the in-flight mark after a failure; any previous entry is kept.
    pub fn fail(&mut self, key: &K) {
        self.in_flight.remove(key);
    }

    fn evict_idle(&mut self, keep: &K, now: Instant) {
        let before = self.entries.len();
        let gc_after = self.gc_after;
        let in_flight = &self.in_flight;
        self.entries.retain(|k, entry| {
            k == keep
                || in_flight.contains(k)
                || now.saturating_duration_since(entry.last_used) < gc_after
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, kept = self.entries.len(), "evicted idle cache entries");
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GC: Duration = Duration::from_secs(300);

    #[test]
    fn test_missing_then_fresh_then_stale() {
        let start = Instant::now();
        let mut cache: QueryCache<u32, &str> = QueryCache::new(Duration::from_secs(60), GC);
        assert!(matches!(cache.lookup(&1, start), Lookup::Missing));

        assert!(cache.begin_fetch(&1));
        cache.complete(&1, "page one", start);

        assert!(matches!(cache.lookup(&1, start + Duration::from_secs(59)), Lookup::Fresh(v) if *v == "page one"));
        assert!(matches!(cache.lookup(&1, start + Duration::from_secs(60)), Lookup::Stale(_)));
    }

    #[test]
    fn test_zero_staleness_is_always_stale() {
        let now = Instant::now();
        let mut cache: QueryCache<u32, u32> = QueryCache::new(Duration::ZERO, GC);
        cache.complete(&1, 10, now);
        assert!(matches!(cache.lookup(&1, now), Lookup::Stale(_)));
    }

    #[test]
    fn test_in_flight_key_is_not_fetched_twice() {
        let mut cache: QueryCache<u32, u32> = QueryCache::new(Duration::ZERO, GC);
        assert!(cache.begin_fetch(&7));
        assert!(!cache.begin_fetch(&7));

        cache.fail(&7);
        assert!(cache.begin_fetch(&7));
    }

    #[test]
    fn test_failure_keeps_previous_entry() {
        let now = Instant::now();
        let mut cache: QueryCache<u32, u32> = QueryCache::new(Duration::ZERO, GC);
        cache.complete(&1, 10, now);
        cache.begin_fetch(&1);
        cache.fail(&1);
        assert!(matches!(cache.lookup(&1, now), Lookup::Stale(v) if *v == 10));
    }

    #[test]
    fn test_idle_entries_are_evicted() {
        let t0 = Instant::now();
        let mut cache: QueryCache<u32, u32> =
            QueryCache::new(Duration::ZERO, Duration::from_secs(60));
        cache.complete(&1, 10, t0);
        cache.complete(&2, 20, t0 + Duration::from_secs(30));
        assert_eq!(cache.len(), 2);

        cache.complete(&3, 30, t0 + Duration::from_secs(61));
        assert_eq!(cache.len(), 2);
        assert!(matches!(
            cache.lookup(&1, t0 + Duration::from_secs(61)),
            Lookup::Missing
        ));
        assert!(matches!(
            cache.lookup(&2, t0 + Duration::from_secs(61)),
            Lookup::Stale(_)
        ));
    }

    #[test]
    fn test_lookup_keeps_entry_alive() {
        let t0 = Instant::now();
        let mut cache: QueryCache<u32, u32> =
            QueryCache::new(Duration::ZERO, Duration::from_secs(60));
        cache.complete(&1, 10, t0);
        cache.lookup(&1, t0 + Duration::from_secs(50));

        cache.complete(&2, 20, t0 + Duration::from_secs(100));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_in_flight_entry_survives_eviction() {
        let t0 = Instant::now();
        let mut cache: QueryCache<u32, u32> =
            QueryCache::new(Duration::ZERO, Duration::from_secs(60));
        cache.complete(&1, 10, t0);
        cache.begin_fetch(&1);

        cache.complete(&2, 20, t0 + Duration::from_secs(120));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_gc_keeps_only_latest_result() {
        let now = Instant::now();
        let mut cache: QueryCache<u32, u32> = QueryCache::new(Duration::ZERO, Duration::ZERO);
        cache.complete(&1, 10, now);
        cache.complete(&2, 20, now);
        assert_eq!(cache.len(), 1);
        assert!(matches!(cache.lookup(&2, now), Lookup::Stale(v) if *v == 20));
    }
}
