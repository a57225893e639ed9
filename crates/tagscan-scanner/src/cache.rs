//! Local tag cache query interface.
//!
//! The scanner asks a cache about each new swipe so the owning system can
//! decide locally while a remote lookup is still pending. How entries get
//! there and when they expire is the cache's business; the scanner only
//! calls [`TagCache::lookup`].

use std::collections::HashMap;
use tagscan_core::TagId;

/// Result of a cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum CacheLookup {
    /// The tag is cached with a stored decision.
    Hit {
        /// Whether the cached decision approves the tag.
        approved: bool,
    },
    /// The tag is not cached.
    Miss,
}

impl CacheLookup {
    /// Returns `true` for any hit, approved or not.
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }
}

/// Read-only tag cache queried synchronously per swipe.
pub trait TagCache: Send {
    /// Look up a tag.
    fn lookup(&self, tag: &TagId) -> CacheLookup;
}

/// In-memory tag cache.
///
/// # Examples
///
/// ```
/// use tagscan_core::TagId;
/// use tagscan_scanner::cache::{CacheLookup, MemoryTagCache, TagCache};
///
/// let tag: TagId = "04-A1-2B".parse().unwrap();
/// let mut cache = MemoryTagCache::new();
/// cache.insert(tag, true);
///
/// assert_eq!(cache.lookup(&tag), CacheLookup::Hit { approved: true });
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTagCache {
    entries: HashMap<TagId, bool>,
}

impl MemoryTagCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a decision for a tag, returning the previous one.
    pub fn insert(&mut self, tag: TagId, approved: bool) -> Option<bool> {
        self.entries.insert(tag, approved)
    }

    /// Forget a tag, returning its decision if it was cached.
    pub fn remove(&mut self, tag: &TagId) -> Option<bool> {
        self.entries.remove(tag)
    }

    /// Number of cached tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(TagId, bool)> for MemoryTagCache {
    fn from_iter<I: IntoIterator<Item = (TagId, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl TagCache for MemoryTagCache {
    fn lookup(&self, tag: &TagId) -> CacheLookup {
        match self.entries.get(tag) {
            Some(&approved) => CacheLookup::Hit { approved },
            None => CacheLookup::Miss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(text: &str) -> TagId {
        text.parse().unwrap()
    }

    #[test]
    fn test_memory_cache_hit_and_miss() {
        let mut cache = MemoryTagCache::new();
        assert!(cache.is_empty());

        cache.insert(tag("04-A1-2B"), true);
        cache.insert(tag("DE-AD-BE-EF"), false);

        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.lookup(&tag("04-A1-2B")),
            CacheLookup::Hit { approved: true }
        );
        assert_eq!(
            cache.lookup(&tag("de-ad-be-ef")),
            CacheLookup::Hit { approved: false }
        );
        assert_eq!(cache.lookup(&tag("01-02-03-04")), CacheLookup::Miss);
    }

    #[test]
    fn test_memory_cache_insert_replaces() {
        let mut cache = MemoryTagCache::new();
        assert_eq!(cache.insert(tag("04-A1-2B"), true), None);
        assert_eq!(cache.insert(tag("04-A1-2B"), false), Some(true));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_memory_cache_remove() {
        let mut cache: MemoryTagCache = [(tag("04-A1-2B"), true)].into_iter().collect();
        assert_eq!(cache.remove(&tag("04-A1-2B")), Some(true));
        assert_eq!(cache.lookup(&tag("04-A1-2B")), CacheLookup::Miss);
    }

    #[test]
    fn test_cache_lookup_is_hit() {
        assert!(CacheLookup::Hit { approved: false }.is_hit());
        assert!(!CacheLookup::Miss.is_hit());
    }

    #[test]
    fn test_cache_lookup_serialize() {
        let json = serde_json::to_value(CacheLookup::Hit { approved: true }).unwrap();
        assert_eq!(json["result"], "hit");
        assert_eq!(json["approved"], true);
    }
}
