//! Concrete codec plug-ins implementing the serialization ports.

pub mod json;
