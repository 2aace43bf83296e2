//! Converters between the JSON codec's representations.
//!
//! Bytes are the hub: text and structured documents both convert to and from
//! UTF-8 JSON bytes, so any pair is at most two hops apart.

use crate::serialization::{ports::FnConverter, services::ConverterRegistry};
use serde_json::Value;

/// Decodes UTF-8 bytes into text.
#[must_use]
pub fn bytes_to_text() -> FnConverter<Vec<u8>, String> {
    FnConverter::new(|bytes: &Vec<u8>| {
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|err| err.to_string())
    })
}

/// Encodes text as UTF-8 bytes.
#[must_use]
pub fn text_to_bytes() -> FnConverter<String, Vec<u8>> {
    FnConverter::new(|text: &String| Ok(text.clone().into_bytes()))
}

/// Parses JSON bytes into a structured document.
#[must_use]
pub fn bytes_to_document() -> FnConverter<Vec<u8>, Value> {
    FnConverter::new(|bytes: &Vec<u8>| serde_json::from_slice(bytes).map_err(|err| err.to_string()))
}

/// Writes a structured document as compact JSON bytes.
#[must_use]
pub fn document_to_bytes() -> FnConverter<Value, Vec<u8>> {
    FnConverter::new(|document: &Value| serde_json::to_vec(document).map_err(|err| err.to_string()))
}

/// Registers the JSON converters with `registry`.
///
/// Edges that already have a converter keep it, so calling this again on the
/// same registry changes nothing.
///
/// # Examples
///
/// ```
/// use missive::serialization::adapters::json::converters;
/// use missive::serialization::domain::RepresentationType;
/// use missive::serialization::services::ConverterRegistry;
///
/// let registry = ConverterRegistry::new();
/// converters::register_defaults(&registry);
///
/// assert!(registry.has_converter(
///     RepresentationType::of::<String>(),
///     RepresentationType::of::<serde_json::Value>(),
/// ));
/// ```
pub fn register_defaults(registry: &ConverterRegistry) {
    registry.register_if_absent(bytes_to_text());
    registry.register_if_absent(text_to_bytes());
    registry.register_if_absent(bytes_to_document());
    registry.register_if_absent(document_to_bytes());
}
