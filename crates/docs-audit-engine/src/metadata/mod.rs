//! # Document Metadata
//!
//! Reading the `key: value` metadata of a document: from YAML front matter,
//! from a heuristic scan when the front matter can't be parsed, from
//! `docfx.json` global defaults and from host-supplied overrides.
//!
//! Keys are normalized (trimmed, lower-cased, `.` replaced by `_`) so
//! `ms.topic` and `MS_Topic` are the same key.

pub mod docfx;
pub mod front_matter;
pub mod heuristic;
pub mod replacement;

pub use docfx::DocFxConfig;
pub use front_matter::{get_metadata, read_metadata};
pub use heuristic::extract_metadata;
pub use replacement::MetadataReplacement;

use serde::Serialize;
use thiserror::Error;

/// The normalized key holding a document's topic.
pub const TOPIC_KEY: &str = "ms_topic";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("invalid YAML front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("metadata is not a key/value mapping")]
    NotAMapping,
}

/// Trims, lower-cases and replaces `.` with `_`. Idempotent.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('.', "_")
}

/// Insertion-ordered metadata with normalized keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, keeping the key's original position when it
    /// already exists. Returns the previous value.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        let key = normalize_key(key);
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => Some(std::mem::replace(v, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Sets `key` only when it isn't present yet. Returns whether it was set.
    pub fn insert_if_absent(&mut self, key: &str, value: impl Into<String>) -> bool {
        if self.contains_key(key) {
            return false;
        }
        self.insert(key, value);
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = normalize_key(key);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The trimmed topic, if present and non-empty.
    pub fn topic(&self) -> Option<&str> {
        self.get(TOPIC_KEY).map(str::trim).filter(|t| !t.is_empty())
    }

    /// Applies `overrides` on top of this metadata; their values win.
    pub fn apply_overrides<'a>(&mut self, overrides: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (key, value) in overrides {
            self.insert(key, value);
        }
    }

    /// Fills in `defaults` beneath this metadata; existing values win.
    pub fn apply_defaults(&mut self, defaults: &Metadata) {
        for (key, value) in defaults.iter() {
            self.insert_if_absent(key, value);
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.insert(key.as_ref(), value);
        }
        metadata
    }
}
