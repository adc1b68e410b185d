//! Process-local reply cache behind the cacheable dispatch path
//!
//! Entries are keyed by the full argv of the read that produced them and
//! expire after the TTL the caller asked for. Writes through the same driver
//! drop every entry that read one of the written keys. When full, expired
//! entries are purged first, then the entry closest to expiry is evicted.
//!
//! A read registers itself with [`ClientCache::begin_read`] before it goes to
//! the server. An invalidation of one of its keys while it is in flight marks
//! it stale, and [`PendingRead::complete`] then refuses to store its reply.

use bytes::Bytes;
use parking_lot::Mutex;
use redis_compat_core::RespValue;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

struct Entry {
    value: RespValue,
    expires_at: Instant,
    keys: Vec<Bytes>,
}

struct InFlight {
    keys: Vec<Bytes>,
    stale: bool,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<Vec<Bytes>, Entry>,
    by_key: HashMap<Bytes, HashSet<Vec<Bytes>>>,
    in_flight: HashMap<u64, InFlight>,
    next_read: u64,
}

impl Inner {
    fn remove(&mut self, argv: &[Bytes]) {
        if let Some(entry) = self.entries.remove(argv) {
            for key in &entry.keys {
                if let Some(set) = self.by_key.get_mut(key) {
                    set.remove(argv);
                    if set.is_empty() {
                        self.by_key.remove(key);
                    }
                }
            }
        }
    }

    fn purge_expired(&mut self, now: Instant) {
        let expired: Vec<Vec<Bytes>> = self
            .entries
            .iter()
            .filter(|(_, e)| e.expires_at <= now)
            .map(|(k, _)| k.clone())
            .collect();
        for argv in expired {
            self.remove(&argv);
        }
    }

    fn evict_one(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.expires_at)
            .map(|(k, _)| k.clone());
        if let Some(argv) = victim {
            self.remove(&argv);
        }
    }
}

/// Bounded TTL cache of read replies
pub struct ClientCache {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl ClientCache {
    /// An empty cache holding at most `capacity` replies
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity,
        }
    }

    /// The cached reply for `argv`, if present and fresh
    pub fn get(&self, argv: &[Bytes]) -> Option<RespValue> {
        let mut inner = self.inner.lock();
        let expires_at = inner.entries.get(argv)?.expires_at;
        if expires_at <= Instant::now() {
            inner.remove(argv);
            return None;
        }
        inner.entries.get(argv).map(|e| e.value.clone())
    }

    /// Store a reply for `ttl`
    pub fn insert(&self, argv: Vec<Bytes>, keys: Vec<Bytes>, value: RespValue, ttl: Duration) {
        if self.capacity == 0 || ttl.is_zero() {
            return;
        }
        let now = Instant::now();
        let mut inner = self.inner.lock();
        inner.remove(&argv);
        if inner.entries.len() >= self.capacity {
            inner.purge_expired(now);
        }
        while inner.entries.len() >= self.capacity {
            inner.evict_one();
        }
        for key in &keys {
            inner
                .by_key
                .entry(key.clone())
                .or_default()
                .insert(argv.clone());
        }
        inner.entries.insert(
            argv,
            Entry {
                value,
                expires_at: now + ttl,
                keys,
            },
        );
    }

    /// Register a read of `keys` about to go to the server
    pub fn begin_read(&self, keys: Vec<Bytes>) -> PendingRead<'_> {
        let mut inner = self.inner.lock();
        let id = inner.next_read;
        inner.next_read = inner.next_read.wrapping_add(1);
        inner.in_flight.insert(id, InFlight { keys, stale: false });
        PendingRead { cache: self, id }
    }

    /// Drop every entry that read one of `keys`
    pub fn invalidate<'a>(&self, keys: impl IntoIterator<Item = &'a Bytes>) {
        let mut inner = self.inner.lock();
        for key in keys {
            if let Some(argvs) = inner.by_key.remove(key) {
                for argv in argvs {
                    inner.remove(&argv);
                }
            }
            for read in inner.in_flight.values_mut() {
                if read.keys.contains(key) {
                    read.stale = true;
                }
            }
        }
    }

    /// Drop everything
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.by_key.clear();
        for read in inner.in_flight.values_mut() {
            read.stale = true;
        }
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A read registered with [`ClientCache::begin_read`].
///
/// Dropping it without calling [`complete`](Self::complete) unregisters it.
pub struct PendingRead<'a> {
    cache: &'a ClientCache,
    id: u64,
}

impl PendingRead<'_> {
    /// Store the reply unless a write to one of the read's keys was seen
    /// since [`ClientCache::begin_read`]. Returns whether it was stored.
    pub fn complete(self, argv: Vec<Bytes>, value: RespValue, ttl: Duration) -> bool {
        let read = self.cache.inner.lock().in_flight.remove(&self.id);
        match read {
            Some(read) if !read.stale => {
                self.cache.insert(argv, read.keys, value, ttl);
                true
            }
            _ => false,
        }
    }
}

impl Drop for PendingRead<'_> {
    fn drop(&mut self) {
        self.cache.inner.lock().in_flight.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&'static str]) -> Vec<Bytes> {
        parts.iter().map(|p| Bytes::from_static(p.as_bytes())).collect()
    }

    #[test]
    fn test_hit_and_expiry() {
        let cache = ClientCache::new(10);
        cache.insert(
            argv(&["GET", "a"]),
            argv(&["a"]),
            RespValue::from("1"),
            Duration::from_secs(60),
        );
        assert_eq!(cache.get(&argv(&["GET", "a"])), Some(RespValue::from("1")));
        assert_eq!(cache.get(&argv(&["GET", "b"])), None);

        cache.insert(
            argv(&["GET", "b"]),
            argv(&["b"]),
            RespValue::from("2"),
            Duration::from_nanos(1),
        );
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(cache.get(&argv(&["GET", "b"])), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidation_by_key() {
        let cache = ClientCache::new(10);
        let ttl = Duration::from_secs(60);
        cache.insert(argv(&["GET", "a"]), argv(&["a"]), RespValue::from("1"), ttl);
        cache.insert(argv(&["STRLEN", "a"]), argv(&["a"]), RespValue::Integer(1), ttl);
        cache.insert(argv(&["GET", "b"]), argv(&["b"]), RespValue::from("2"), ttl);

        cache.invalidate(&argv(&["a"]));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&argv(&["GET", "b"])).is_some());
    }

    #[test]
    fn test_capacity_evicts_soonest_expiry() {
        let cache = ClientCache::new(2);
        cache.insert(argv(&["GET", "a"]), argv(&["a"]), RespValue::Null, Duration::from_secs(5));
        cache.insert(argv(&["GET", "b"]), argv(&["b"]), RespValue::Null, Duration::from_secs(50));
        cache.insert(argv(&["GET", "c"]), argv(&["c"]), RespValue::Null, Duration::from_secs(50));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&argv(&["GET", "a"])).is_none());
        assert!(cache.get(&argv(&["GET", "c"])).is_some());
    }

    #[test]
    fn test_write_during_read_is_not_cached() {
        let cache = ClientCache::new(10);
        let ttl = Duration::from_secs(60);

        let read = cache.begin_read(argv(&["k"]));
        cache.invalidate(&argv(&["k"]));
        assert!(!read.complete(argv(&["GET", "k"]), RespValue::from("old"), ttl));
        assert_eq!(cache.get(&argv(&["GET", "k"])), None);

        // a write to another key leaves the read alone
        let read = cache.begin_read(argv(&["k"]));
        cache.invalidate(&argv(&["other"]));
        assert!(read.complete(argv(&["GET", "k"]), RespValue::from("new"), ttl));
        assert_eq!(cache.get(&argv(&["GET", "k"])), Some(RespValue::from("new")));
    }

    #[test]
    fn test_clear_during_read_is_not_cached() {
        let cache = ClientCache::new(10);
        let read = cache.begin_read(argv(&["k"]));
        cache.clear();
        assert!(!read.complete(argv(&["GET", "k"]), RespValue::Null, Duration::from_secs(5)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_abandoned_read_unregisters() {
        let cache = ClientCache::new(10);
        drop(cache.begin_read(argv(&["k"])));
        assert!(cache.inner.lock().in_flight.is_empty());
    }

    #[test]
    fn test_zero_capacity_disables() {
        let cache = ClientCache::new(0);
        cache.insert(argv(&["GET", "a"]), argv(&["a"]), RespValue::Null, Duration::from_secs(5));
        assert!(cache.is_empty());
    }
}
