use std::collections::HashMap;

use webcontent_core::SourceKey;

/// Last successfully fetched content per source.
///
/// Entries are never evicted and never expire: once a source has content,
/// later refreshes reuse it for the rest of the session instead of hitting
/// the network again, even if the remote page has changed since.
#[derive(Debug, Clone, Default)]
pub struct ContentCache {
    entries: HashMap<SourceKey, String>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SourceKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stores `text` under `key`, replacing any previous value.
    pub fn put(&mut self, key: SourceKey, text: impl Into<String>) {
        self.entries.insert(key, text.into());
    }

    pub fn has(&self, key: &SourceKey) -> bool {
        self.entries.contains_key(key)
    }

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

    #[test]
    fn put_is_last_write_wins() {
        let mut cache = ContentCache::new();
        let key = SourceKey::new("wordCounter");
        assert!(!cache.has(&key));

        cache.put(key.clone(), "first");
        cache.put(key.clone(), "second");

        assert_eq!(cache.get(&key), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keys_sharing_a_url_are_independent() {
        let mut cache = ContentCache::new();
        cache.put(SourceKey::new("wordCounter"), "same page");

        assert!(cache.has(&SourceKey::new("wordCounter")));
        assert!(!cache.has(&SourceKey::new("everyNth")));
        assert_eq!(cache.get(&SourceKey::new("everyNth")), None);
    }
}
