//! End-to-end tests for envelopes backed by the JSON codec.
//!
//! Tests are organized into modules by functionality:
//! - `envelope_tests`: Storing and reconstructing message and event envelopes
//! - `replay_tests`: Replaying heterogeneous event streams
//! - `converter_tests`: Codecs sharing a converter registry

mod roundtrip {
    pub mod helpers;

    mod converter_tests;
    mod envelope_tests;
    mod replay_tests;
}
