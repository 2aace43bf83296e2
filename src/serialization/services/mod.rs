//! Services composing the serialization ports.
//!
//! - [`ConverterRegistry`] resolves converter chains between representations
//! - [`LazyObject`] defers and caches decoding of a serialized value

mod chain;
mod converter_registry;
mod lazy_object;

pub use chain::{ChainedConverter, IdentityConverter};
pub use converter_registry::{ConverterConfig, ConverterRegistry};
pub use lazy_object::LazyObject;
