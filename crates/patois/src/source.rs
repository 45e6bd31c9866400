//! The message-source capability and the in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SourceError;

/// A key→pattern mapping capability.
///
/// `Ok(None)` means the source has no entry for the key, which is a normal
/// outcome; errors are reserved strictly for malfunction and abort the whole
/// lookup.
pub trait MessageSource: Send + Sync {
    fn pattern(&self, key: &str) -> Result<Option<&str>, SourceError>;
}

impl<T: MessageSource + ?Sized> MessageSource for Arc<T> {
    fn pattern(&self, key: &str) -> Result<Option<&str>, SourceError> {
        (**self).pattern(key)
    }
}

/// A fixed in-memory message source.
#[derive(Clone, Debug, Default)]
pub struct MapSource {
    entries: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, pattern: impl Into<String>) {
        self.entries.insert(key.into(), pattern.into());
    }

    /// Chainable insert, for literal catalog construction.
    pub fn with(mut self, key: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.insert(key, pattern);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl MessageSource for MapSource {
    fn pattern(&self, key: &str) -> Result<Option<&str>, SourceError> {
        Ok(self.entries.get(key).map(String::as_str))
    }
}

impl From<HashMap<String, String>> for MapSource {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (key, pattern) in iter {
            source.insert(key, pattern);
        }
        source
    }
}
