//! Logical type descriptor for serialized values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the logical (not wire) type of a serialized value.
///
/// Two descriptors are equal when both the name and the revision match. The
/// revision is populated by the codec at serialization time and is absent for
/// types that never declared one.
///
/// # Examples
///
/// ```
/// use missive::serialization::domain::SerializedType;
///
/// let v1 = SerializedType::new("order_placed", Some("1"));
/// let v2 = SerializedType::new("order_placed", Some("2"));
/// assert_ne!(v1, v2);
/// assert_eq!(v1.name(), "order_placed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializedType {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revision: Option<String>,
}

impl SerializedType {
    /// Creates a descriptor from a name and an optional revision.
    #[must_use]
    pub fn new(name: impl Into<String>, revision: Option<&str>) -> Self {
        Self {
            name: name.into(),
            revision: revision.map(str::to_owned),
        }
    }

    /// Creates a descriptor without a revision.
    #[must_use]
    pub fn unrevisioned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revision: None,
        }
    }

    /// Returns the logical type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the revision, if any.
    #[must_use]
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// Returns `true` if the name is empty or whitespace-only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}

impl fmt::Display for SerializedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.revision {
            Some(revision) => write!(f, "{}@{revision}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
