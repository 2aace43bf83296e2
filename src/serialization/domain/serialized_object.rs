//! Format-tagged container for serialized data.

use super::{RepresentationType, SerializedType};
use crate::serialization::error::{SerializationError, SerializationResult};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased serialized data, shared between every reader of a
/// [`SerializedObject`].
pub type SerializedData = Arc<dyn Any + Send + Sync>;

/// A value encoded in a concrete representation, tagged with the logical type
/// it encodes.
///
/// The data is held behind an [`Arc`], so cloning a serialized object is cheap
/// and decoding never consumes the stored representation.
///
/// # Invariants
///
/// - `representation_type` always describes the Rust type of `data`
/// - `data` is an encoding of `serialized_type` in that representation
///
/// # Examples
///
/// ```
/// use missive::serialization::domain::{SerializedObject, SerializedType};
///
/// let object = SerializedObject::new(
///     br#"{"x":1}"#.to_vec(),
///     SerializedType::unrevisioned("point"),
/// );
/// assert!(object.representation_type().is::<Vec<u8>>());
/// assert_eq!(object.data::<Vec<u8>>().map(Vec::len), Some(7));
/// ```
#[derive(Clone)]
pub struct SerializedObject {
    data: SerializedData,
    representation_type: RepresentationType,
    serialized_type: SerializedType,
}

impl SerializedObject {
    /// Wraps `data` held in representation `R`.
    #[must_use]
    pub fn new<R: Any + Send + Sync>(data: R, serialized_type: SerializedType) -> Self {
        Self {
            data: Arc::new(data),
            representation_type: RepresentationType::of::<R>(),
            serialized_type,
        }
    }

    /// Rebuilds a serialized object from already-erased data.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::UnexpectedData`] if `data` is not of the
    /// declared `representation_type`.
    pub fn from_erased(
        data: SerializedData,
        representation_type: RepresentationType,
        serialized_type: SerializedType,
    ) -> SerializationResult<Self> {
        if (*data).type_id() != representation_type.id() {
            return Err(SerializationError::UnexpectedData {
                expected: representation_type,
            });
        }
        Ok(Self {
            data,
            representation_type,
            serialized_type,
        })
    }

    /// Returns the data if it is held in representation `R`.
    #[must_use]
    pub fn data<R: Any>(&self) -> Option<&R> {
        self.data.downcast_ref::<R>()
    }

    /// Returns the data held in representation `R`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::RepresentationMismatch`] if the data is
    /// held in another representation.
    pub fn try_data<R: Any>(&self) -> SerializationResult<&R> {
        self.data
            .downcast_ref::<R>()
            .ok_or(SerializationError::RepresentationMismatch {
                expected: RepresentationType::of::<R>(),
                actual: self.representation_type,
            })
    }

    /// Returns a shared handle to the erased data.
    #[must_use]
    pub fn erased_data(&self) -> SerializedData {
        Arc::clone(&self.data)
    }

    /// Returns the representation the data is held in.
    #[must_use]
    pub const fn representation_type(&self) -> RepresentationType {
        self.representation_type
    }

    /// Returns the logical type the data encodes.
    #[must_use]
    pub const fn serialized_type(&self) -> &SerializedType {
        &self.serialized_type
    }
}

impl fmt::Debug for SerializedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializedObject")
            .field("representation_type", &self.representation_type)
            .field("serialized_type", &self.serialized_type)
            .finish_non_exhaustive()
    }
}
