//! Serialization layer for message payloads and metadata.
//!
//! Values move between their in-memory form and one or more wire
//! representations (bytes, text, structured documents). Decoding is deferred
//! until a value is actually read.
//!
//! # Architecture
//!
//! - **Domain**: descriptors of serialized data ([`domain::SerializedType`],
//!   [`domain::RepresentationType`], [`domain::SerializedObject`],
//!   [`domain::ResolvedType`])
//! - **Ports**: codec and converter contracts ([`ports::Serializer`],
//!   [`ports::ContentTypeConverter`])
//! - **Services**: converter chain resolution
//!   ([`services::ConverterRegistry`]) and lazy materialization
//!   ([`services::LazyObject`])
//! - **Adapters**: the JSON reference codec
//!   ([`adapters::json::JsonSerializer`])
//!
//! # Example
//!
//! ```
//! use missive::serialization::adapters::json::{JsonSerializer, TypeRegistration};
//! use missive::serialization::ports::SerializerExt;
//! use missive::serialization::services::LazyObject;
//! use std::sync::Arc;
//!
//! let serializer = Arc::new(
//!     JsonSerializer::builder()
//!         .register(TypeRegistration::of::<u64>("counter"))
//!         .build()
//!         .expect("valid registrations"),
//! );
//! let stored = serializer.serialize_to::<String>(&41_u64).expect("registered type");
//!
//! let lazy = LazyObject::<u64>::from_serialized(stored, serializer).expect("named type");
//! assert!(!lazy.is_materialized());
//! assert_eq!(lazy.get().copied().ok(), Some(41));
//! assert!(lazy.is_materialized());
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
