//! Error types for serialization, conversion, and lazy materialization.
//!
//! Uses `thiserror` for typed variants that callers can inspect to decide a
//! recovery policy (skip, dead-letter, abort).

use super::domain::{RepresentationType, SerializedType};
use thiserror::Error;

/// Result type for serialization operations.
pub type SerializationResult<T> = Result<T, SerializationError>;

/// Errors raised while encoding, decoding, or converting serialized data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// A construction-time contract was violated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The codec failed to encode an object.
    #[error("failed to serialize object of type '{type_name}': {reason}")]
    SerializeFailed {
        /// The logical or Rust name of the object being encoded.
        type_name: String,
        /// Description of the codec failure.
        reason: String,
    },

    /// The codec failed to decode a stored representation.
    #[error("failed to deserialize '{serialized_type}': {reason}")]
    DeserializeFailed {
        /// The logical type named by the stored representation.
        serialized_type: SerializedType,
        /// Description of the codec failure.
        reason: String,
    },

    /// A single conversion hop failed on otherwise well-typed input.
    #[error("conversion from {from} to {to} failed: {reason}")]
    ConversionFailed {
        /// The representation being converted.
        from: RepresentationType,
        /// The representation being produced.
        to: RepresentationType,
        /// Description of the failure.
        reason: String,
    },

    /// The logical type named by a stored representation is not known.
    #[error("no type registered for '{0}'")]
    UnresolvedType(SerializedType),

    /// The Rust type of an object handed to a serializer was never registered.
    ///
    /// The payload identifies the Rust type as far as it is known.
    #[error("object's Rust type is not registered for serialization ({0})")]
    UnregisteredType(String),

    /// No chain of registered converters links the two representations.
    #[error("no converter path from {from} to {to}")]
    NoConverterPath {
        /// The representation held.
        from: RepresentationType,
        /// The representation required.
        to: RepresentationType,
    },

    /// Data handed to a converter or accessor has a different representation.
    #[error("expected representation {expected} but found {actual}")]
    RepresentationMismatch {
        /// The representation the caller required.
        expected: RepresentationType,
        /// The representation actually held.
        actual: RepresentationType,
    },

    /// Erased data is not held in the representation it was declared or
    /// expected to have.
    #[error("data is not a {expected}")]
    UnexpectedData {
        /// The representation the data should have been held in.
        expected: RepresentationType,
    },

    /// A materialized payload is not of the Rust type the envelope declares.
    #[error("payload of type '{actual}' cannot be read as {expected}")]
    PayloadTypeMismatch {
        /// The Rust type the envelope was declared with.
        expected: &'static str,
        /// The logical type the stored payload carries.
        actual: String,
    },
}

impl SerializationError {
    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a serialize failure for the named type.
    #[must_use]
    pub fn serialize_failed(type_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::SerializeFailed {
            type_name: type_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a deserialize failure for the given stored type.
    #[must_use]
    pub fn deserialize_failed(serialized_type: &SerializedType, reason: impl ToString) -> Self {
        Self::DeserializeFailed {
            serialized_type: serialized_type.clone(),
            reason: reason.to_string(),
        }
    }

    /// Creates a conversion failure for a single hop.
    #[must_use]
    pub fn conversion_failed(
        from: RepresentationType,
        to: RepresentationType,
        reason: impl ToString,
    ) -> Self {
        Self::ConversionFailed {
            from,
            to,
            reason: reason.to_string(),
        }
    }

    /// Returns `true` if no converter chain could be found.
    #[must_use]
    pub const fn is_no_converter_path(&self) -> bool {
        matches!(self, Self::NoConverterPath { .. })
    }

    /// Returns `true` if this error is a construction-time contract violation.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Fails with [`SerializationError::InvalidArgument`] unless `condition` holds.
pub(crate) fn ensure_argument(condition: bool, message: &str) -> SerializationResult<()> {
    if condition {
        Ok(())
    } else {
        Err(SerializationError::invalid_argument(message))
    }
}
