//! Core types for resbundle.
//! Both loading strategies decode into [`LevelData`]; handles read from it.

/// The raw key/value data for a single level of a fallback chain.
///
/// Insertion order is preserved so that key enumeration over a chain is
/// deterministic. `LevelData` knows nothing about fallback; it answers for
/// exactly one locale level and is immutable once attached to a handle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelData {
    pairs: Vec<(String, String)>,
}

impl LevelData {
    /// Creates an empty data source.
    pub fn new() -> Self {
        LevelData { pairs: Vec::new() }
    }

    /// Inserts a key/value pair. A key already present keeps its original
    /// position and takes the new value (last write wins).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Returns the value for `key` at this level only, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether this level defines `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Iterates this level's keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates this level's pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LevelData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = LevelData::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let data: LevelData = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        let keys: Vec<&str> = data.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_key_keeps_position_takes_last_value() {
        let data: LevelData = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(data.len(), 2);
        assert_eq!(data.get("a"), Some("3"));
        let keys: Vec<&str> = data.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_get_missing_key() {
        let data = LevelData::new();
        assert_eq!(data.get("missing"), None);
        assert!(!data.contains_key("missing"));
        assert!(data.is_empty());
    }
}
