//! Unit tests for the message module.
//!
//! Tests are organised by domain concept, covering identity preservation,
//! metadata copy-on-write and lazy payload access.

mod event_message_tests;
