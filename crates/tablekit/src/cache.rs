//! Count cache seam: cross-request storage for unfiltered row counts.
//!
//! Implementations express failure as a miss (`None`/no-op); an
//! unreachable cache must never fail a request. Invalidation is external,
//! typically on write.

use std::collections::BTreeMap;

///
/// CountCache
///

pub trait CountCache {
    /// True when a value is present for the key.
    fn has(&self, key: &str) -> bool;

    /// Fetch the cached count, or `None` on miss or cache failure.
    fn get(&self, key: &str) -> Option<u64>;

    /// Store a count; best effort, last write wins.
    fn put(&mut self, key: &str, value: u64);
}

///
/// NoCache
///
/// Inert cache for callers that do not wire a store: always misses.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoCache;

impl CountCache for NoCache {
    fn has(&self, _key: &str) -> bool {
        false
    }

    fn get(&self, _key: &str) -> Option<u64> {
        None
    }

    fn put(&mut self, _key: &str, _value: u64) {}
}

///
/// MemoryCountCache
///
/// Reference in-process implementation.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryCountCache {
    entries: BTreeMap<String, u64>,
}

impl MemoryCountCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CountCache for MemoryCountCache {
    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<u64> {
        self.entries.get(key).copied()
    }

    fn put(&mut self, key: &str, value: u64) {
        self.entries.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_cache_stores_and_overwrites() {
        let mut cache = MemoryCountCache::new();

        assert!(!cache.has("enso:tables:users"));
        assert_eq!(cache.get("enso:tables:users"), None);

        cache.put("enso:tables:users", 7);
        assert!(cache.has("enso:tables:users"));
        assert_eq!(cache.get("enso:tables:users"), Some(7));

        cache.put("enso:tables:users", 9);
        assert_eq!(cache.get("enso:tables:users"), Some(9));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn no_cache_always_misses() {
        let mut cache = NoCache;

        cache.put("enso:tables:users", 7);
        assert!(!cache.has("enso:tables:users"));
        assert_eq!(cache.get("enso:tables:users"), None);
    }
}
