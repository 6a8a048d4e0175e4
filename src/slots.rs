//! Named-capture slot mapping.
//!
//! A slot is a named capture extracted by the pattern engine. For any key,
//! three states are observable and all three carry meaning:
//!
//! - **absent**: the matched grammar alternative never defines this field
//! - **present but empty**: the field matched zero-width or an empty
//!   alternative ("the slot matched, but no symbol was found")
//! - **present with a value**: the captured literal
//!
//! Consumers must not collapse the first two states: several normalization
//! rules (hemisphere defaulting, time-of-day sentinels) branch on exactly
//! this distinction.

use std::collections::BTreeMap;

use regex::{Captures, Regex};
use serde::Serialize;

/// A read-only mapping from capture-group name to captured literal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Slots(BTreeMap<String, String>);

impl Slots {
    /// Create an empty mapping (a grammar alternative with no named fields).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from `(key, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Collect the named groups that participated in a regex match.
    ///
    /// Groups that did not participate are absent; groups that matched
    /// zero-width are present with an empty value.
    pub fn from_captures(re: &Regex, caps: &Captures<'_>) -> Self {
        let mut map = BTreeMap::new();
        for name in re.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                map.insert(name.to_string(), m.as_str().to_string());
            }
        }
        Self(map)
    }

    /// Insert or replace a slot. Intended for engines and test fixtures.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Whether the key is present at all, even with an empty value.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The captured literal for a present key; `None` when absent.
    ///
    /// An empty string here means "present but empty".
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The captured literal only when present *and* non-empty.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Number of present keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no keys are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over present `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
