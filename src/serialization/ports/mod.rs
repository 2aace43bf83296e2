//! Port trait definitions for the serialization subsystem.
//!
//! Codec plug-ins implement [`Serializer`]; format transcoders implement
//! [`ContentTypeConverter`]. The core only ever talks to these traits.

pub mod converter;
pub mod serializer;

pub use converter::{ContentTypeConverter, FnConverter};
pub use serializer::{Serializer, SerializerExt};

#[cfg(test)]
pub use serializer::MockSerializer;
