//! Immutable message and event envelopes.
//!
//! An envelope carries an identifier, a metadata map and a payload. The
//! payload (and metadata) may still be a serialized representation, in which
//! case it is decoded through [`crate::serialization::services::LazyObject`]
//! only when first read.
//!
//! # Example
//!
//! ```
//! use missive::message::domain::{Backing, Envelope, EventMessage, MessageId, MetaData};
//! use missive::serialization::adapters::json::{JsonSerializer, TypeRegistration};
//! use missive::serialization::ports::SerializerExt;
//! use mockable::{Clock, DefaultClock};
//! use serde_json::{Value, json};
//! use std::sync::Arc;
//!
//! let serializer = Arc::new(
//!     JsonSerializer::builder()
//!         .register(TypeRegistration::of::<Value>("order"))
//!         .build()
//!         .expect("valid registrations"),
//! );
//! let payload = serializer
//!     .serialize_to::<Vec<u8>>(&json!({"x": 1}))
//!     .expect("registered type");
//! let metadata = serializer
//!     .serialize_to::<Vec<u8>>(&MetaData::empty())
//!     .expect("metadata is registered by default");
//!
//! let event = EventMessage::<Value>::from_serialized(
//!     MessageId::from("evt-1"),
//!     DefaultClock.utc(),
//!     payload,
//!     metadata,
//!     serializer,
//! )
//! .expect("stored event");
//!
//! assert_eq!(event.backing(), Backing::LazyBacked);
//! assert!(!event.is_payload_materialized());
//! assert_eq!(event.payload().ok(), Some(&json!({"x": 1})));
//! assert!(event.is_payload_materialized());
//! ```

pub mod domain;

#[cfg(test)]
mod tests;
