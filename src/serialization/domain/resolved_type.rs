//! Outcome of resolving a logical type name to a Rust type.

use super::SerializedType;
use std::any::{Any, TypeId, type_name};
use std::fmt;

/// A Rust type that a serialized value can be decoded into.
#[derive(Debug, Clone, Copy)]
pub struct KnownType {
    id: TypeId,
    name: &'static str,
}

impl KnownType {
    /// Returns the known type for `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the Rust type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the [`TypeId`] of the type.
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for KnownType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for KnownType {}

/// Result of resolving a [`SerializedType`] in the current type universe.
///
/// Resolution never fails: a name that cannot be resolved yields
/// [`ResolvedType::Unknown`], which callers treat as a first-class outcome
/// (for example, skipping an event whose type no longer exists).
///
/// # Examples
///
/// ```
/// use missive::serialization::domain::{ResolvedType, SerializedType};
///
/// let known = ResolvedType::of::<String>();
/// assert!(known.is::<String>());
///
/// let unknown = ResolvedType::Unknown(SerializedType::unrevisioned("gone"));
/// assert!(unknown.is_unknown());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    /// The logical type maps onto a Rust type.
    Known(KnownType),
    /// The logical type is not registered; the descriptor is kept for
    /// diagnostics.
    Unknown(SerializedType),
}

impl ResolvedType {
    /// Returns the resolved type for `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self::Known(KnownType::of::<T>())
    }

    /// Returns `true` if resolution failed.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Returns `true` if this resolves to `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        matches!(self, Self::Known(known) if known.id() == TypeId::of::<T>())
    }

    /// Returns the known type, if resolution succeeded.
    #[must_use]
    pub const fn known(&self) -> Option<&KnownType> {
        match self {
            Self::Known(known) => Some(known),
            Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(known) => f.write_str(known.name()),
            Self::Unknown(serialized_type) => write!(f, "unknown({serialized_type})"),
        }
    }
}

/// A payload whose concrete Rust type is only known at runtime.
///
/// Declaring an envelope as `Message<DynamicPayload>` lets a consumer
/// materialize stored payloads of many different registered types and inspect
/// them by downcast.
///
/// # Examples
///
/// ```
/// use missive::serialization::domain::DynamicPayload;
///
/// let payload = DynamicPayload::new(42_u32);
/// assert_eq!(payload.downcast_ref::<u32>(), Some(&42));
/// assert!(payload.downcast_ref::<String>().is_none());
/// ```
pub struct DynamicPayload(Box<dyn Any + Send + Sync>);

impl DynamicPayload {
    /// Wraps a concrete value.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Wraps an already boxed value.
    #[must_use]
    pub fn from_boxed(value: Box<dyn Any + Send + Sync>) -> Self {
        Self(value)
    }

    /// Returns the value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Returns `true` if the value is a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for DynamicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DynamicPayload").finish_non_exhaustive()
    }
}
