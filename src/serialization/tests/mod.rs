//! Unit tests for the serialization module.
//!
//! Tests are organised by component: descriptors, converter resolution, the
//! lazy cell and the JSON codec.
