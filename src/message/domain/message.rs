//! Generic message envelope.

use super::{
    Backing, Envelope, MessageId, MetaData,
    record::{EnvelopeRecord, EnvelopeRecordRef},
};
use crate::serialization::{
    domain::{ResolvedType, SerializedObject},
    error::{SerializationResult, ensure_argument},
    ports::Serializer,
    services::LazyObject,
};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _, ser::Error as _};
use std::fmt;
use std::sync::Arc;

struct MessageParts<T> {
    identifier: MessageId,
    metadata: Arc<LazyObject<MetaData>>,
    payload: Arc<LazyObject<T>>,
}

/// An immutable message envelope around a payload of type `T`.
///
/// Cloning is cheap and yields the same instance. A message is either built
/// from a live payload, which mints a fresh identifier, or reconstructed from
/// stored data under its persisted identifier, in which case payload and
/// metadata are only decoded when read.
///
/// # Invariants
///
/// - The identifier is shared by every metadata-derived sibling
/// - Siblings share the payload cell, so a payload is decoded at most once
///   across all of them
///
/// # Examples
///
/// ```
/// use missive::message::domain::{Envelope, Message, MessageId, MetaData};
/// use serde_json::json;
///
/// let message = Message::from_parts(MessageId::from("evt-1"), json!({"x": 1}), MetaData::empty());
/// let traced = message.with_metadata(MetaData::from_iter([("trace", "t1")]));
///
/// assert_eq!(traced.identifier().as_str(), "evt-1");
/// assert_eq!(traced.metadata().map(|m| m.len()).ok(), Some(1));
/// assert_eq!(message.metadata().map(|m| m.len()).ok(), Some(0));
/// ```
pub struct Message<T> {
    inner: Arc<MessageParts<T>>,
}

impl<T: Send + Sync + 'static> Message<T> {
    /// Creates a message with a fresh identifier and empty metadata.
    #[must_use]
    pub fn new(payload: T) -> Self {
        Self::from_parts(MessageId::new(), payload, MetaData::empty())
    }

    /// Creates a message with a fresh identifier and the given metadata.
    #[must_use]
    pub fn new_with_metadata(payload: T, metadata: MetaData) -> Self {
        Self::from_parts(MessageId::new(), payload, metadata)
    }

    /// Creates a message from materialized parts under an existing
    /// identifier.
    #[must_use]
    pub fn from_parts(identifier: MessageId, payload: T, metadata: MetaData) -> Self {
        Self::from_cells(
            identifier,
            Arc::new(LazyObject::new(payload)),
            Arc::new(LazyObject::new(metadata)),
        )
    }

    /// Reconstructs a message from stored data.
    ///
    /// Nothing is decoded here; a malformed payload or metadata
    /// representation is reported when it is first read.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::InvalidArgument`] if the identifier is
    /// blank or either representation does not name its logical type.
    ///
    /// [`SerializationError::InvalidArgument`]: crate::serialization::error::SerializationError::InvalidArgument
    pub fn from_serialized(
        identifier: MessageId,
        payload: SerializedObject,
        metadata: SerializedObject,
        serializer: Arc<dyn Serializer>,
    ) -> SerializationResult<Self> {
        ensure_argument(!identifier.is_blank(), "a stored message needs an identifier")?;
        let payload_cell = LazyObject::from_serialized(payload, Arc::clone(&serializer))?;
        let metadata_cell = LazyObject::from_serialized(metadata, serializer)?;
        Ok(Self::from_cells(
            identifier,
            Arc::new(payload_cell),
            Arc::new(metadata_cell),
        ))
    }

    fn from_cells(
        identifier: MessageId,
        payload: Arc<LazyObject<T>>,
        metadata: Arc<LazyObject<MetaData>>,
    ) -> Self {
        Self {
            inner: Arc::new(MessageParts {
                identifier,
                metadata,
                payload,
            }),
        }
    }

    /// Returns a shared handle to the payload, decoding it on first access.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if the stored payload cannot be decoded.
    pub fn shared_payload(&self) -> SerializationResult<Arc<T>> {
        self.inner.payload.shared()
    }

    /// Returns the stored payload representation, if the payload was
    /// supplied serialized.
    #[must_use]
    pub fn serialized_payload(&self) -> Option<&SerializedObject> {
        self.inner.payload.serialized()
    }

    /// Returns the stored metadata representation, if the metadata was
    /// supplied serialized.
    #[must_use]
    pub fn serialized_metadata(&self) -> Option<&SerializedObject> {
        self.inner.metadata.serialized()
    }

    fn sibling(&self, metadata: MetaData) -> Self {
        Self::from_cells(
            self.inner.identifier.clone(),
            Arc::clone(&self.inner.payload),
            Arc::new(LazyObject::new(metadata)),
        )
    }
}

impl<T: Send + Sync + 'static> Envelope<T> for Message<T> {
    fn identifier(&self) -> &MessageId {
        &self.inner.identifier
    }

    fn metadata(&self) -> SerializationResult<MetaData> {
        self.inner.metadata.get().cloned()
    }

    fn payload(&self) -> SerializationResult<&T> {
        self.inner.payload.get()
    }

    fn payload_type(&self) -> &ResolvedType {
        self.inner.payload.resolved_type()
    }

    fn is_payload_materialized(&self) -> bool {
        self.inner.payload.is_materialized()
    }

    fn backing(&self) -> Backing {
        if self.inner.payload.is_serialized_backed() || self.inner.metadata.is_serialized_backed()
        {
            Backing::LazyBacked
        } else {
            Backing::Eager
        }
    }

    fn with_metadata(&self, metadata: MetaData) -> Self {
        match self.metadata() {
            Ok(current) if current == metadata => self.clone(),
            _ => self.sibling(metadata),
        }
    }

    fn and_metadata(&self, metadata: MetaData) -> SerializationResult<Self> {
        if metadata.is_empty() {
            return Ok(self.clone());
        }
        let merged = self.metadata()?.merged_with(&metadata);
        Ok(self.with_metadata(merged))
    }

    fn snapshot(&self) -> SerializationResult<Self> {
        if self.backing() == Backing::Eager {
            return Ok(self.clone());
        }
        let payload = self.shared_payload()?;
        let metadata = self.metadata()?;
        Ok(Self::from_cells(
            self.inner.identifier.clone(),
            Arc::new(LazyObject::from_shared(payload)),
            Arc::new(LazyObject::new(metadata)),
        ))
    }

    fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Message<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Message<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("identifier", &self.inner.identifier)
            .field("metadata", &self.inner.metadata)
            .field("payload", &self.inner.payload)
            .finish()
    }
}

impl<T> fmt::Display for Message<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Message[{}]", self.inner.identifier)
    }
}

/// Serializes the materialized form of the message.
///
/// A stored payload or metadata map is decoded first; a decoding failure is
/// reported as a serde error.
impl<T: Serialize + Send + Sync + 'static> Serialize for Message<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EnvelopeRecordRef {
            identifier: self.identifier(),
            timestamp: None,
            metadata: self.metadata().map_err(S::Error::custom)?,
            payload: self.payload().map_err(S::Error::custom)?,
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + Send + Sync + 'static> Deserialize<'de> for Message<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = EnvelopeRecord::<T>::deserialize(deserializer)?;
        if record.identifier.is_blank() {
            return Err(D::Error::custom("message identifier must not be blank"));
        }
        Ok(Self::from_parts(
            record.identifier,
            record.payload,
            record.metadata,
        ))
    }
}
