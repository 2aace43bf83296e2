//! Serializer port: object to serialized representation and back.

use crate::serialization::{
    domain::{RepresentationType, ResolvedType, SerializedObject, SerializedType},
    error::{SerializationError, SerializationResult},
};
use std::any::{Any, type_name};

/// Port for a codec that converts objects to and from serialized
/// representations.
///
/// # Contract
///
/// - `deserialize` must be a pure, side-effect-free function of the stored
///   representation. Lazy materialization depends on this: a payload may be
///   decoded by whichever reader gets there first, and the stored
///   representation is read again by snapshots.
/// - `can_serialize_to` is advisory. A `true` answer does not guarantee that a
///   particular object graph converts successfully.
/// - `resolve_type` never fails. Unknown names yield
///   [`ResolvedType::Unknown`] and should be logged by the implementation.
/// - Implementations are stateless from the caller's point of view and safe to
///   share between threads.
#[cfg_attr(test, mockall::automock)]
pub trait Serializer: Send + Sync {
    /// Serializes `object` into the `expected` representation.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] if the object's type is unknown to the
    /// codec, encoding fails, or no conversion to `expected` exists.
    fn serialize(
        &self,
        object: &(dyn Any + Send + Sync),
        expected: RepresentationType,
    ) -> SerializationResult<SerializedObject>;

    /// Returns `true` if this serializer can, in principle, produce the
    /// `expected` representation.
    fn can_serialize_to(&self, expected: RepresentationType) -> bool;

    /// Decodes the object held by `serialized`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] if the logical type cannot be resolved,
    /// the representation cannot be converted to the codec's input format, or
    /// decoding fails.
    fn deserialize(
        &self,
        serialized: &SerializedObject,
    ) -> SerializationResult<Box<dyn Any + Send + Sync>>;

    /// Resolves the logical type named by `serialized_type`.
    fn resolve_type(&self, serialized_type: &SerializedType) -> ResolvedType;
}

/// Typed convenience methods available on every [`Serializer`].
///
/// # Examples
///
/// ```
/// use missive::serialization::adapters::json::{JsonSerializer, TypeRegistration};
/// use missive::serialization::ports::SerializerExt;
///
/// let serializer = JsonSerializer::builder()
///     .register(TypeRegistration::of::<String>("greeting"))
///     .build()
///     .expect("valid registrations");
///
/// let serialized = serializer
///     .serialize_to::<Vec<u8>>(&"hello".to_owned())
///     .expect("serializable");
/// let restored: String = serializer.deserialize_into(&serialized).expect("decodable");
/// assert_eq!(restored, "hello");
/// ```
pub trait SerializerExt: Serializer {
    /// Serializes `object` into representation `R`.
    ///
    /// # Errors
    ///
    /// See [`Serializer::serialize`].
    fn serialize_to<R: Any>(
        &self,
        object: &(dyn Any + Send + Sync),
    ) -> SerializationResult<SerializedObject> {
        self.serialize(object, RepresentationType::of::<R>())
    }

    /// Returns `true` if representation `R` is supported.
    fn can_serialize_to_type<R: Any>(&self) -> bool {
        self.can_serialize_to(RepresentationType::of::<R>())
    }

    /// Decodes `serialized` and downcasts the result to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::PayloadTypeMismatch`] if the decoded
    /// object is not a `T`, or any error from [`Serializer::deserialize`].
    fn deserialize_into<T: Any>(&self, serialized: &SerializedObject) -> SerializationResult<T> {
        let decoded = self.deserialize(serialized)?;
        decoded
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| SerializationError::PayloadTypeMismatch {
                expected: type_name::<T>(),
                actual: serialized.serialized_type().to_string(),
            })
    }
}

impl<S: Serializer + ?Sized> SerializerExt for S {}
