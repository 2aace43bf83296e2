//! Event envelope: a message stamped with the time it occurred.

use super::{
    Backing, Envelope, Message, MessageId, MetaData,
    record::{EnvelopeRecord, EnvelopeRecordRef},
};
use crate::serialization::{
    domain::{ResolvedType, SerializedObject},
    error::SerializationResult,
    ports::Serializer,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _, ser::Error as _};
use std::fmt;
use std::sync::Arc;

/// A message describing something that happened at a point in time.
///
/// The timestamp is captured once, at construction, and carried unchanged
/// by every metadata-derived sibling, as is the identifier.
///
/// # Examples
///
/// ```
/// use missive::message::domain::{Envelope, EventMessage, MetaData};
/// use mockable::DefaultClock;
///
/// let event = EventMessage::new("order placed".to_owned(), &DefaultClock);
/// let tagged = event
///     .and_metadata(MetaData::from_iter([("tenant", "acme")]))
///     .expect("eager metadata");
///
/// assert_eq!(tagged.timestamp(), event.timestamp());
/// assert_eq!(tagged.identifier(), event.identifier());
/// ```
pub struct EventMessage<T> {
    message: Message<T>,
    timestamp: DateTime<Utc>,
}

impl<T: Send + Sync + 'static> EventMessage<T> {
    /// Creates an event with a fresh identifier, empty metadata and the
    /// clock's current time.
    #[must_use]
    pub fn new(payload: T, clock: &impl Clock) -> Self {
        Self::from_message(Message::new(payload), clock.utc())
    }

    /// Creates an event with a fresh identifier, the given metadata and the
    /// clock's current time.
    #[must_use]
    pub fn new_with_metadata(payload: T, metadata: MetaData, clock: &impl Clock) -> Self {
        Self::from_message(Message::new_with_metadata(payload, metadata), clock.utc())
    }

    /// Creates an event from materialized parts under an existing identifier
    /// and timestamp.
    #[must_use]
    pub fn from_parts(
        identifier: MessageId,
        payload: T,
        metadata: MetaData,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::from_message(Message::from_parts(identifier, payload, metadata), timestamp)
    }

    /// Reconstructs an event from stored data without decoding it.
    ///
    /// # Errors
    ///
    /// See [`Message::from_serialized`].
    pub fn from_serialized(
        identifier: MessageId,
        timestamp: DateTime<Utc>,
        payload: SerializedObject,
        metadata: SerializedObject,
        serializer: Arc<dyn Serializer>,
    ) -> SerializationResult<Self> {
        Message::from_serialized(identifier, payload, metadata, serializer)
            .map(|message| Self::from_message(message, timestamp))
    }

    /// Wraps an existing message, stamping it with `timestamp`.
    #[must_use]
    pub const fn from_message(message: Message<T>, timestamp: DateTime<Utc>) -> Self {
        Self { message, timestamp }
    }

    /// Returns when the event occurred.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the underlying message.
    #[must_use]
    pub const fn message(&self) -> &Message<T> {
        &self.message
    }

    /// Returns a shared handle to the payload, decoding it on first access.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if the stored payload cannot be decoded.
    pub fn shared_payload(&self) -> SerializationResult<Arc<T>> {
        self.message.shared_payload()
    }

    fn with_message(&self, message: Message<T>) -> Self {
        Self::from_message(message, self.timestamp)
    }
}

impl<T: Send + Sync + 'static> Envelope<T> for EventMessage<T> {
    fn identifier(&self) -> &MessageId {
        self.message.identifier()
    }

    fn metadata(&self) -> SerializationResult<MetaData> {
        self.message.metadata()
    }

    fn payload(&self) -> SerializationResult<&T> {
        self.message.payload()
    }

    fn payload_type(&self) -> &ResolvedType {
        self.message.payload_type()
    }

    fn is_payload_materialized(&self) -> bool {
        self.message.is_payload_materialized()
    }

    fn backing(&self) -> Backing {
        self.message.backing()
    }

    fn with_metadata(&self, metadata: MetaData) -> Self {
        self.with_message(self.message.with_metadata(metadata))
    }

    fn and_metadata(&self, metadata: MetaData) -> SerializationResult<Self> {
        self.message
            .and_metadata(metadata)
            .map(|message| self.with_message(message))
    }

    fn snapshot(&self) -> SerializationResult<Self> {
        self.message
            .snapshot()
            .map(|message| self.with_message(message))
    }

    fn same_instance(&self, other: &Self) -> bool {
        self.message.same_instance(&other.message) && self.timestamp == other.timestamp
    }
}

impl<T> Clone for EventMessage<T> {
    fn clone(&self) -> Self {
        Self {
            message: self.message.clone(),
            timestamp: self.timestamp,
        }
    }
}

impl<T> fmt::Debug for EventMessage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventMessage")
            .field("message", &self.message)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

impl<T: Send + Sync + 'static> fmt::Display for EventMessage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventMessage[{}]", self.identifier())
    }
}

/// Serializes the materialized form of the event, timestamp included.
impl<T: Serialize + Send + Sync + 'static> Serialize for EventMessage<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EnvelopeRecordRef {
            identifier: self.identifier(),
            timestamp: Some(self.timestamp),
            metadata: self.metadata().map_err(S::Error::custom)?,
            payload: self.payload().map_err(S::Error::custom)?,
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + Send + Sync + 'static> Deserialize<'de> for EventMessage<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = EnvelopeRecord::<T>::deserialize(deserializer)?;
        let timestamp = record
            .timestamp
            .ok_or_else(|| D::Error::missing_field("timestamp"))?;
        if record.identifier.is_blank() {
            return Err(D::Error::custom("event identifier must not be blank"));
        }
        Ok(Self::from_parts(
            record.identifier,
            record.payload,
            record.metadata,
            timestamp,
        ))
    }
}
