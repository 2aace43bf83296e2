//! Lazy materialization cell for serialized values.
//!
//! A [`LazyObject`] either holds an already-materialized value or a
//! serialized representation plus the serializer able to decode it. Decoding
//! happens on first access and the result is published once; every later
//! reader sees the same value.

use crate::serialization::{
    domain::{DynamicPayload, ResolvedType, SerializedObject, SerializedType},
    error::{SerializationError, SerializationResult, ensure_argument},
    ports::Serializer,
};
use once_cell::sync::OnceCell;
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

enum Source {
    Materialized,
    Serialized {
        object: SerializedObject,
        serializer: Arc<dyn Serializer>,
    },
}

/// Defers decoding of a serialized value until it is requested.
///
/// The cache is a publish-once cell: concurrent first readers never observe
/// a partially materialized value. A failed decode leaves the cell empty, so
/// the error is reported to each reader that asks for the value.
///
/// # Examples
///
/// ```
/// use missive::serialization::services::LazyObject;
///
/// let eager = LazyObject::new(7_u32);
/// assert!(eager.is_materialized());
/// assert_eq!(eager.get().copied().ok(), Some(7));
/// ```
pub struct LazyObject<T> {
    source: Source,
    value: OnceCell<Arc<T>>,
    resolved_type: OnceCell<ResolvedType>,
}

impl<T: Any + Send + Sync> LazyObject<T> {
    /// Wraps an already materialized value. No serializer is ever consulted.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::from_shared(Arc::new(value))
    }

    /// Wraps an already materialized shared value.
    #[must_use]
    pub fn from_shared(value: Arc<T>) -> Self {
        Self {
            source: Source::Materialized,
            value: OnceCell::with_value(value),
            resolved_type: OnceCell::with_value(ResolvedType::of::<T>()),
        }
    }

    /// Wraps a serialized representation to be decoded on demand.
    ///
    /// Construction never decodes, so malformed data is only reported when
    /// the value is read.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::InvalidArgument`] if the representation
    /// does not name a logical type.
    pub fn from_serialized(
        object: SerializedObject,
        serializer: Arc<dyn Serializer>,
    ) -> SerializationResult<Self> {
        ensure_argument(
            !object.serialized_type().is_blank(),
            "a serialized object must name its logical type",
        )?;
        Ok(Self {
            source: Source::Serialized { object, serializer },
            value: OnceCell::new(),
            resolved_type: OnceCell::new(),
        })
    }

    /// Returns the logical type of the value without decoding it.
    ///
    /// For a serialized value this asks the serializer to resolve the stored
    /// type name; an unresolvable name yields [`ResolvedType::Unknown`].
    pub fn resolved_type(&self) -> &ResolvedType {
        self.resolved_type.get_or_init(|| match &self.source {
            Source::Materialized => ResolvedType::of::<T>(),
            Source::Serialized { object, serializer } => {
                serializer.resolve_type(object.serialized_type())
            }
        })
    }

    /// Returns the value, decoding and caching it on first access.
    ///
    /// # Errors
    ///
    /// Returns any [`SerializationError`] raised by the serializer, or
    /// [`SerializationError::PayloadTypeMismatch`] if the decoded value is not
    /// a `T`.
    pub fn get(&self) -> SerializationResult<&T> {
        self.materialize().map(|value| &**value)
    }

    /// Returns a shared handle to the value, decoding it on first access.
    ///
    /// # Errors
    ///
    /// See [`LazyObject::get`].
    pub fn shared(&self) -> SerializationResult<Arc<T>> {
        self.materialize().map(Arc::clone)
    }

    /// Returns `true` once the value is available without decoding.
    #[must_use]
    pub fn is_materialized(&self) -> bool {
        self.value.get().is_some()
    }

    /// Returns `true` if the value was supplied as a serialized
    /// representation.
    #[must_use]
    pub const fn is_serialized_backed(&self) -> bool {
        matches!(self.source, Source::Serialized { .. })
    }

    /// Returns the stored representation, if the value was supplied serialized.
    #[must_use]
    pub const fn serialized(&self) -> Option<&SerializedObject> {
        match &self.source {
            Source::Serialized { object, .. } => Some(object),
            Source::Materialized => None,
        }
    }

    fn materialize(&self) -> SerializationResult<&Arc<T>> {
        self.value.get_or_try_init(|| match &self.source {
            Source::Materialized => Err(SerializationError::invalid_argument(
                "materialized object holds no value",
            )),
            Source::Serialized { object, serializer } => {
                trace!(
                    serialized_type = %object.serialized_type(),
                    rust_type = type_name::<T>(),
                    "materializing lazily deserialized object"
                );
                let decoded = serializer.deserialize(object)?;
                downcast_decoded::<T>(decoded, object.serialized_type()).map(Arc::from)
            }
        })
    }
}

/// Downcasts a decoded value, wrapping it when `T` is [`DynamicPayload`].
fn downcast_decoded<T: Any>(
    decoded: Box<dyn Any + Send + Sync>,
    serialized_type: &SerializedType,
) -> SerializationResult<Box<T>> {
    let candidate: Box<dyn Any + Send + Sync> =
        if TypeId::of::<T>() == TypeId::of::<DynamicPayload>() && !decoded.is::<DynamicPayload>()
        {
            Box::new(DynamicPayload::from_boxed(decoded))
        } else {
            decoded
        };
    candidate
        .downcast::<T>()
        .map_err(|_| SerializationError::PayloadTypeMismatch {
            expected: type_name::<T>(),
            actual: serialized_type.to_string(),
        })
}

impl<T> fmt::Debug for LazyObject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let serialized_type = match &self.source {
            Source::Serialized { object, .. } => Some(object.serialized_type()),
            Source::Materialized => None,
        };
        f.debug_struct("LazyObject")
            .field("serialized_type", &serialized_type)
            .field("materialized", &self.value.get().is_some())
            .finish_non_exhaustive()
    }
}
