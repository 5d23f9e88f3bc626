//! Process-lifetime bundle cache.
//!
//! Populate-only: entries are added at first resolution and never removed,
//! never recomputed, never mutated in place. A key that once resolved to
//! nothing stays nothing. The cache is a plain structure owned by a
//! resolver (behind its lock) rather than a global, so tests can use a
//! fresh cache per case.

use std::collections::HashMap;
use std::sync::Arc;

use crate::handle::Bundle;

/// Identity of one resolved level: which loader, which qualified name, and
/// which default locale was in effect when resolution ran.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    loader: u64,
    qualified_name: String,
    default_locale: String,
}

impl CacheKey {
    pub fn new(
        loader: u64,
        qualified_name: impl Into<String>,
        default_locale: impl Into<String>,
    ) -> Self {
        CacheKey {
            loader,
            qualified_name: qualified_name.into(),
            default_locale: default_locale.into(),
        }
    }
}

/// Identity-keyed store of published resolution outcomes.
///
/// The entry payload is `Option<Arc<Bundle>>`: `Some` is a resolved handle,
/// `None` is the published "nothing resolves here" outcome. A key with no
/// entry at all has never finished resolving, which is how "absent" stays
/// distinguishable from "in progress".
#[derive(Default)]
pub struct BundleCache {
    entries: HashMap<CacheKey, Option<Arc<Bundle>>>,
}

impl BundleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the published outcome for `key`, or `None` if the key has
    /// never been resolved.
    pub fn get(&self, key: &CacheKey) -> Option<Option<Arc<Bundle>>> {
        self.entries.get(key).cloned()
    }

    /// Publishes an outcome for `key` and returns the outcome the cache now
    /// holds. First publication wins: if the key is already present the
    /// existing entry is returned untouched and `outcome` is discarded.
    pub fn publish(
        &mut self,
        key: CacheKey,
        outcome: Option<Arc<Bundle>>,
    ) -> Option<Arc<Bundle>> {
        self.entries.entry(key).or_insert(outcome).clone()
    }

    /// Number of published entries, including absent outcomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LevelData;

    fn handle(locale: &str) -> Arc<Bundle> {
        Arc::new(Bundle::new("msgs", locale, LevelData::new(), None))
    }

    #[test]
    fn test_unresolved_key_is_distinct_from_absent() {
        let mut cache = BundleCache::new();
        let key = CacheKey::new(1, "msgs_en", "en_US");
        assert!(cache.get(&key).is_none());

        cache.publish(key.clone(), None);
        assert!(matches!(cache.get(&key), Some(None)));
    }

    #[test]
    fn test_first_publication_wins() {
        let mut cache = BundleCache::new();
        let key = CacheKey::new(1, "msgs_en", "en_US");

        let first = handle("en");
        let kept = cache.publish(key.clone(), Some(first.clone()));
        assert!(Arc::ptr_eq(kept.as_ref().unwrap(), &first));

        let second = handle("en");
        let kept = cache.publish(key.clone(), Some(second));
        assert!(Arc::ptr_eq(kept.as_ref().unwrap(), &first));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_absent_outcome_is_permanent() {
        let mut cache = BundleCache::new();
        let key = CacheKey::new(1, "msgs_xx", "en_US");

        cache.publish(key.clone(), None);
        let kept = cache.publish(key.clone(), Some(handle("xx")));
        assert!(kept.is_none());
        assert!(matches!(cache.get(&key), Some(None)));
    }

    #[test]
    fn test_keys_differ_by_default_locale_and_loader() {
        let mut cache = BundleCache::new();
        cache.publish(CacheKey::new(1, "msgs_en", "en_US"), Some(handle("en")));
        assert!(cache.get(&CacheKey::new(1, "msgs_en", "fr_FR")).is_none());
        assert!(cache.get(&CacheKey::new(2, "msgs_en", "en_US")).is_none());
    }
}
