//! Capability shared by every envelope kind.

use super::{MessageId, MetaData};
use crate::serialization::{domain::ResolvedType, error::SerializationResult};

/// How an envelope's payload and metadata were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backing {
    /// Payload and metadata were supplied as values.
    Eager,
    /// Payload or metadata is still a serialized representation that is
    /// decoded on first access.
    LazyBacked,
}

/// An immutable identifier, metadata and payload triple.
///
/// Callers work against this capability without knowing whether the envelope
/// is [`Backing::Eager`] or [`Backing::LazyBacked`]. Metadata-derived copies
/// keep the identifier (and any timestamp) and share the payload cell, so
/// decoding work already done is shared with every sibling.
///
/// # Examples
///
/// ```
/// use missive::message::domain::{Backing, Envelope, Message, MetaData};
/// use serde_json::json;
///
/// let original = Message::new(json!({"x": 1}));
/// let traced = original
///     .and_metadata(MetaData::from_iter([("trace", "t1")]))
///     .expect("eager metadata");
///
/// assert_eq!(traced.identifier(), original.identifier());
/// assert_eq!(traced.backing(), Backing::Eager);
/// assert!(original.and_metadata(MetaData::empty()).expect("eager").same_instance(&original));
/// ```
pub trait Envelope<T>: Clone {
    /// Returns the identifier, which never changes across derived copies.
    fn identifier(&self) -> &MessageId;

    /// Returns the metadata, decoding it on first access if it was stored
    /// serialized.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if stored metadata cannot be decoded.
    fn metadata(&self) -> SerializationResult<MetaData>;

    /// Returns the payload, decoding it on first access if it was stored
    /// serialized.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if the stored payload cannot be decoded.
    fn payload(&self) -> SerializationResult<&T>;

    /// Returns the logical payload type without decoding the payload.
    fn payload_type(&self) -> &ResolvedType;

    /// Returns `true` once the payload is available without decoding.
    fn is_payload_materialized(&self) -> bool;

    /// Reports how the envelope was constructed.
    fn backing(&self) -> Backing;

    /// Returns an envelope carrying `metadata` instead of the current map.
    ///
    /// Returns this same instance when `metadata` equals the current map.
    #[must_use]
    fn with_metadata(&self, metadata: MetaData) -> Self;

    /// Returns an envelope whose metadata is the current map merged with
    /// `metadata`, the argument winning on conflicting keys.
    ///
    /// Returns this same instance when `metadata` is empty.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if stored metadata cannot be decoded.
    fn and_metadata(&self, metadata: MetaData) -> SerializationResult<Self>;

    /// Returns an equivalent [`Backing::Eager`] envelope with payload and
    /// metadata materialized.
    ///
    /// The materialized payload is shared with this envelope, not copied.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if payload or metadata cannot be
    /// decoded.
    fn snapshot(&self) -> SerializationResult<Self>;

    /// Returns `true` if both handles refer to the same envelope instance.
    fn same_instance(&self, other: &Self) -> bool;
}
