use std::fmt;

use crate::RefreshError;

/// Default URL for both sources; the two roles may point at the same page.
pub const DEFAULT_CONTENT_URL: &str = "https://www.compass.com/about";

/// Stable identifier of a source's role. Caching and fetching are keyed by
/// this, never by URL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceKey(String);

impl SourceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub key: SourceKey,
    pub url: String,
}

impl Source {
    pub fn new(key: impl Into<SourceKey>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
        }
    }

    /// Parses the URL without touching the network. Empty and relative
    /// strings are rejected.
    pub fn parsed_url(&self) -> Result<url::Url, RefreshError> {
        let trimmed = self.url.trim();
        if trimmed.is_empty() {
            return Err(self.invalid_url());
        }
        url::Url::parse(trimmed).map_err(|_| self.invalid_url())
    }

    fn invalid_url(&self) -> RefreshError {
        RefreshError::InvalidUrl {
            key: self.key.clone(),
            value: self.url.clone(),
        }
    }
}

/// The derived views computed from fetched content. Each one consumes the
/// content of the source with the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    WordCounter,
    EveryNth,
}

impl Transform {
    pub fn key(self) -> SourceKey {
        match self {
            Transform::WordCounter => SourceKey::new("wordCounter"),
            Transform::EveryNth => SourceKey::new("everyNth"),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::WordCounter => write!(f, "word counter"),
            Transform::EveryNth => write!(f, "every nth character"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub word_counter_url: String,
    pub every_nth_url: String,
    pub nth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            word_counter_url: DEFAULT_CONTENT_URL.to_string(),
            every_nth_url: DEFAULT_CONTENT_URL.to_string(),
            nth: crate::DEFAULT_NTH,
        }
    }
}

impl SessionConfig {
    /// Sources in request order: word counter first, then every-Nth.
    pub fn sources(&self) -> Vec<Source> {
        vec![
            Source::new(Transform::WordCounter.key(), self.word_counter_url.clone()),
            Source::new(Transform::EveryNth.key(), self.every_nth_url.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_relative_urls_are_invalid() {
        for raw in ["", "   ", "validURL", "://missing-scheme"] {
            let source = Source::new("wordCounter", raw);
            assert_eq!(
                source.parsed_url(),
                Err(RefreshError::InvalidUrl {
                    key: SourceKey::new("wordCounter"),
                    value: raw.to_string(),
                }),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn absolute_url_parses() {
        let source = Source::new("everyNth", DEFAULT_CONTENT_URL);
        assert_eq!(source.parsed_url().unwrap().host_str(), Some("www.compass.com"));
    }

    #[test]
    fn default_config_shares_one_url_across_distinct_keys() {
        let sources = SessionConfig::default().sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].url, sources[1].url);
        assert_ne!(sources[0].key, sources[1].key);
    }
}
