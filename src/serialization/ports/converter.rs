//! Content type converter port: single-hop transcoding between
//! representation formats.

use crate::serialization::{
    domain::{RepresentationType, SerializedData, SerializedObject},
    error::{SerializationError, SerializationResult},
};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Converts serialized data from one concrete representation to another.
///
/// Implementations provide the data-level conversion; the conversion of a
/// whole [`SerializedObject`] is derived from it: the logical type is kept,
/// the representation becomes [`Self::target_type`], and the data is
/// transformed.
///
/// # Implementation Notes
///
/// - Converters should be stateless and deterministic
/// - `convert_data` must produce data of exactly [`Self::target_type`]
pub trait ContentTypeConverter: fmt::Debug + Send + Sync {
    /// The representation this converter accepts.
    fn source_type(&self) -> RepresentationType;

    /// The representation this converter produces.
    fn target_type(&self) -> RepresentationType;

    /// Converts erased data held in [`Self::source_type`].
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::UnexpectedData`] if `data` is not held
    /// in the source representation, or
    /// [`SerializationError::ConversionFailed`] if the data cannot be
    /// transcoded.
    fn convert_data(&self, data: SerializedData) -> SerializationResult<SerializedData>;

    /// Converts a whole serialized object, keeping its logical type.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::RepresentationMismatch`] if `original`
    /// is not held in [`Self::source_type`], or any error from
    /// [`Self::convert_data`].
    fn convert(&self, original: &SerializedObject) -> SerializationResult<SerializedObject> {
        if original.representation_type() != self.source_type() {
            return Err(SerializationError::RepresentationMismatch {
                expected: self.source_type(),
                actual: original.representation_type(),
            });
        }
        let converted = self.convert_data(original.erased_data())?;
        SerializedObject::from_erased(
            converted,
            self.target_type(),
            original.serialized_type().clone(),
        )
    }
}

type ConvertFn<S, T> = dyn Fn(&S) -> Result<T, String> + Send + Sync;

/// A single-hop converter built from a typed conversion function.
///
/// The function reports failures as a message; the converter wraps them in
/// [`SerializationError::ConversionFailed`] with both endpoints attached.
///
/// # Examples
///
/// ```
/// use missive::serialization::domain::{SerializedObject, SerializedType};
/// use missive::serialization::ports::{ContentTypeConverter, FnConverter};
///
/// let converter = FnConverter::new(|text: &String| Ok(text.len()));
/// let original = SerializedObject::new("abc".to_owned(), SerializedType::unrevisioned("word"));
/// let converted = converter.convert(&original).expect("convertible");
/// assert_eq!(converted.data::<usize>(), Some(&3));
/// ```
pub struct FnConverter<S, T> {
    convert: Arc<ConvertFn<S, T>>,
    _marker: PhantomData<fn(&S) -> T>,
}

impl<S, T> FnConverter<S, T>
where
    S: Any + Send + Sync,
    T: Any + Send + Sync,
{
    /// Creates a converter from a conversion function.
    #[must_use]
    pub fn new<F>(convert: F) -> Self
    where
        F: Fn(&S) -> Result<T, String> + Send + Sync + 'static,
    {
        Self {
            convert: Arc::new(convert),
            _marker: PhantomData,
        }
    }

    /// Applies the conversion to typed data.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::ConversionFailed`] if the function fails.
    pub fn convert_value(&self, original: &S) -> SerializationResult<T> {
        (self.convert)(original).map_err(|reason| {
            SerializationError::conversion_failed(
                RepresentationType::of::<S>(),
                RepresentationType::of::<T>(),
                reason,
            )
        })
    }
}

impl<S, T> Clone for FnConverter<S, T> {
    fn clone(&self) -> Self {
        Self {
            convert: Arc::clone(&self.convert),
            _marker: PhantomData,
        }
    }
}

impl<S, T> ContentTypeConverter for FnConverter<S, T>
where
    S: Any + Send + Sync,
    T: Any + Send + Sync,
{
    fn source_type(&self) -> RepresentationType {
        RepresentationType::of::<S>()
    }

    fn target_type(&self) -> RepresentationType {
        RepresentationType::of::<T>()
    }

    fn convert_data(&self, data: SerializedData) -> SerializationResult<SerializedData> {
        let source = data
            .downcast_ref::<S>()
            .ok_or(SerializationError::UnexpectedData {
                expected: self.source_type(),
            })?;
        let converted: SerializedData = Arc::new(self.convert_value(source)?);
        Ok(converted)
    }
}

impl<S, T> fmt::Debug for FnConverter<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter")
            .field("source", &std::any::type_name::<S>())
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}
