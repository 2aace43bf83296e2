//! Missive: message envelopes with lazily deserialized payloads.
//!
//! This crate provides the serialization and envelope layer of an
//! event-driven messaging system. Applications wrap events and commands in
//! immutable envelopes; payloads move between their in-memory form and wire
//! representations through pluggable codecs and converter chains, and are
//! only decoded when a consumer reads them.
//!
//! # Architecture
//!
//! Missive follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types with no codec dependencies
//! - **Ports**: Abstract trait interfaces for codecs and converters
//! - **Services**: Converter chain resolution and lazy materialization
//! - **Adapters**: Concrete codecs (JSON)
//!
//! # Modules
//!
//! - [`message`]: Message and event envelopes with copy-on-write metadata
//! - [`serialization`]: Serializers, converters and the lazy cell

pub mod message;
pub mod serialization;
