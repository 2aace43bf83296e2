//! Immutable key/value metadata attached to every envelope.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, btree_map};
use std::sync::Arc;

static EMPTY: Lazy<MetaData> = Lazy::new(|| MetaData(Arc::new(BTreeMap::new())));

/// Immutable metadata map from string keys to JSON values.
///
/// Every operation that looks like a mutation returns a new map and leaves
/// the receiver untouched. Clones share storage, and operations that change
/// nothing hand back the receiver itself, so envelopes can detect no-op
/// updates by identity. Equality is by content.
///
/// Keys are kept ordered, so serialized metadata is deterministic.
///
/// # Examples
///
/// ```
/// use missive::message::domain::MetaData;
/// use serde_json::json;
///
/// let base = MetaData::from_iter([("trace", json!("t1"))]);
/// let merged = base.merged_with(&MetaData::from_iter([("trace", json!("t2")), ("user", json!(7))]));
///
/// assert_eq!(merged.get("trace"), Some(&json!("t2")));
/// assert_eq!(merged.len(), 2);
/// assert_eq!(base.get("trace"), Some(&json!("t1")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct MetaData(Arc<BTreeMap<String, Value>>);

impl MetaData {
    /// Logical type name under which codecs register metadata.
    pub const SERIALIZED_TYPE_NAME: &'static str = "missive.MetaData";

    /// Returns the canonical empty instance.
    ///
    /// Every empty map produced by this type shares the same storage.
    #[must_use]
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    /// Creates metadata from a map.
    #[must_use]
    pub fn from_map(entries: BTreeMap<String, Value>) -> Self {
        if entries.is_empty() {
            Self::empty()
        } else {
            Self(Arc::new(entries))
        }
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Returns a map where the given entries overwrite existing keys.
    ///
    /// Always produces a new map, even when nothing changes.
    #[must_use]
    pub fn with<I, K, V>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut combined = (*self.0).clone();
        combined.extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        Self::from_map(combined)
    }

    /// Returns the union of both maps; `other` wins on conflicting keys.
    ///
    /// Returns the receiver when `other` is empty, and `other` when the
    /// receiver is empty.
    #[must_use]
    pub fn merged_with(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut combined = (*self.0).clone();
        combined.extend(
            other
                .0
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        Self::from_map(combined)
    }

    /// Returns a map with one additional entry.
    #[must_use]
    pub fn and(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with([(key.into(), value.into())])
    }

    /// Returns a map without the given keys.
    ///
    /// Returns the receiver when none of the keys are present.
    #[must_use]
    pub fn without_keys<I, K>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut remaining = (*self.0).clone();
        let before = remaining.len();
        for key in keys {
            remaining.remove(key.as_ref());
        }
        if remaining.len() == before {
            self.clone()
        } else {
            Self::from_map(remaining)
        }
    }

    /// Returns `true` if both handles share the same storage.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for MetaData {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<BTreeMap<String, Value>> for MetaData {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self::from_map(entries)
    }
}

impl From<MetaData> for BTreeMap<String, Value> {
    fn from(metadata: MetaData) -> Self {
        Arc::unwrap_or_clone(metadata.0)
    }
}

impl<'a> IntoIterator for &'a MetaData {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MetaData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
