//! Domain types for the message subsystem.
//!
//! Envelopes are immutable: every operation that changes metadata returns a
//! sibling envelope and leaves the receiver untouched.

mod envelope;
mod event_message;
mod ids;
mod message;
mod metadata;
mod record;

pub use envelope::{Backing, Envelope};
pub use event_message::EventMessage;
pub use ids::MessageId;
pub use message::Message;
pub use metadata::MetaData;
