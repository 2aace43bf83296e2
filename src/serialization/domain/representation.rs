//! Runtime token for a concrete representation format.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies the Rust type that holds serialized data (for example
/// `Vec<u8>`, `String`, or `serde_json::Value`).
///
/// Representation types are the nodes of the converter graph. Equality and
/// hashing use the underlying [`TypeId`]; the type name is kept for
/// diagnostics only.
///
/// # Examples
///
/// ```
/// use missive::serialization::domain::RepresentationType;
///
/// let bytes = RepresentationType::of::<Vec<u8>>();
/// assert!(bytes.is::<Vec<u8>>());
/// assert_ne!(bytes, RepresentationType::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct RepresentationType {
    id: TypeId,
    name: &'static str,
}

impl RepresentationType {
    /// Returns the representation token for `R`.
    #[must_use]
    pub fn of<R: ?Sized + Any>() -> Self {
        Self {
            id: TypeId::of::<R>(),
            name: type_name::<R>(),
        }
    }

    /// Returns the Rust type name of the representation.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the [`TypeId`] of the representation.
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns `true` if this token stands for `R`.
    #[must_use]
    pub fn is<R: Any>(&self) -> bool {
        self.id == TypeId::of::<R>()
    }
}

impl PartialEq for RepresentationType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RepresentationType {}

impl Hash for RepresentationType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RepresentationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RepresentationType").field(&self.name).finish()
    }
}

impl fmt::Display for RepresentationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
