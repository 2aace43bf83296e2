//! JSON codec built on `serde_json`.
//!
//! The native representation is UTF-8 JSON bytes (`Vec<u8>`). A
//! `serde_json::Value` is accepted as a structured document and decoded
//! directly; text (`String`) is reached through the converter registry.

pub mod converters;
mod serializer;
mod type_registry;

pub use serializer::{JsonSerializer, JsonSerializerBuilder, JsonSerializerConfig};
pub use type_registry::{TypeRegistration, TypeRegistry};
