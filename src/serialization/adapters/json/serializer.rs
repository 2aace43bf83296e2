//! JSON implementation of the [`Serializer`] port.

use super::{
    converters,
    type_registry::{TypeRegistration, TypeRegistry},
};
use crate::serialization::{
    domain::{RepresentationType, ResolvedType, SerializedObject, SerializedType},
    error::{SerializationError, SerializationResult},
    ports::Serializer,
    services::{ConverterConfig, ConverterRegistry},
};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

/// Configuration for a [`JsonSerializer`].
///
/// # Examples
///
/// ```
/// use missive::serialization::adapters::json::JsonSerializerConfig;
///
/// assert!(!JsonSerializerConfig::default().pretty_print);
/// assert!(JsonSerializerConfig::pretty().pretty_print);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonSerializerConfig {
    /// Whether byte and text output is indented.
    pub pretty_print: bool,
    /// Configuration of the converter registry created by the builder.
    pub converters: ConverterConfig,
}

impl JsonSerializerConfig {
    /// Creates a configuration producing indented output.
    #[must_use]
    pub fn pretty() -> Self {
        Self {
            pretty_print: true,
            ..Self::default()
        }
    }
}

/// Reference codec encoding registered types as JSON.
///
/// Values serialize to UTF-8 JSON bytes and are then converted to the
/// requested representation through the converter registry. Serialized
/// objects carry the logical name and revision from the type's
/// [`TypeRegistration`].
///
/// # Examples
///
/// ```
/// use missive::serialization::adapters::json::{JsonSerializer, TypeRegistration};
/// use missive::serialization::ports::SerializerExt;
///
/// let serializer = JsonSerializer::builder()
///     .register(TypeRegistration::of::<Vec<u32>>("numbers").with_revision("1"))
///     .build()
///     .expect("valid registrations");
///
/// let serialized = serializer
///     .serialize_to::<String>(&vec![1_u32, 2, 3])
///     .expect("registered type");
/// assert_eq!(serialized.data::<String>().map(String::as_str), Some("[1,2,3]"));
///
/// let restored: Vec<u32> = serializer.deserialize_into(&serialized).expect("decodable");
/// assert_eq!(restored, vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    types: TypeRegistry,
    converters: Arc<ConverterRegistry>,
    config: JsonSerializerConfig,
}

impl Default for JsonSerializer {
    fn default() -> Self {
        let config = JsonSerializerConfig::default();
        Self {
            types: TypeRegistry::new(),
            converters: default_converters(config.converters),
            config,
        }
    }
}

impl JsonSerializer {
    /// Creates a serializer that only knows the built-in types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts building a serializer.
    #[must_use]
    pub fn builder() -> JsonSerializerBuilder {
        JsonSerializerBuilder::default()
    }

    /// Returns the registered types.
    #[must_use]
    pub const fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Returns the converter registry used to reach other representations.
    #[must_use]
    pub const fn converters(&self) -> &Arc<ConverterRegistry> {
        &self.converters
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &JsonSerializerConfig {
        &self.config
    }

    fn encode_bytes(&self, document: &Value, type_name: &str) -> SerializationResult<Vec<u8>> {
        let encoded = if self.config.pretty_print {
            serde_json::to_vec_pretty(document)
        } else {
            serde_json::to_vec(document)
        };
        encoded.map_err(|err| SerializationError::serialize_failed(type_name, err))
    }

    fn document(&self, serialized: &SerializedObject) -> SerializationResult<Value> {
        if let Some(document) = serialized.data::<Value>() {
            return Ok(document.clone());
        }
        let bytes = self.converters.convert_to::<Vec<u8>>(serialized)?;
        serde_json::from_slice(bytes.try_data::<Vec<u8>>()?)
            .map_err(|err| SerializationError::deserialize_failed(serialized.serialized_type(), err))
    }
}

impl Serializer for JsonSerializer {
    fn serialize(
        &self,
        object: &(dyn Any + Send + Sync),
        expected: RepresentationType,
    ) -> SerializationResult<SerializedObject> {
        let registration = self
            .types
            .by_type(object.type_id())
            .ok_or_else(|| {
                SerializationError::UnregisteredType(format!("type id {:?}", object.type_id()))
            })?;
        let document = registration.encode(object)?;
        let serialized_type = registration.serialized_type().clone();
        if expected.is::<Value>() {
            return Ok(SerializedObject::new(document, serialized_type));
        }
        let bytes = self.encode_bytes(&document, registration.known_type().name())?;
        self.converters
            .convert(&SerializedObject::new(bytes, serialized_type), expected)
    }

    fn can_serialize_to(&self, expected: RepresentationType) -> bool {
        expected.is::<Value>()
            || self
                .converters
                .has_converter(RepresentationType::of::<Vec<u8>>(), expected)
    }

    fn deserialize(
        &self,
        serialized: &SerializedObject,
    ) -> SerializationResult<Box<dyn Any + Send + Sync>> {
        let serialized_type = serialized.serialized_type();
        let registration = self
            .types
            .by_name(serialized_type.name())
            .ok_or_else(|| SerializationError::UnresolvedType(serialized_type.clone()))?;
        if registration.serialized_type().revision() != serialized_type.revision() {
            debug!(
                stored = %serialized_type,
                registered = %registration.serialized_type(),
                "decoding a value written under a different revision"
            );
        }
        let document = self.document(serialized)?;
        registration.decode(document, serialized_type)
    }

    fn resolve_type(&self, serialized_type: &SerializedType) -> ResolvedType {
        self.types.resolve(serialized_type)
    }
}

/// Builder for [`JsonSerializer`].
///
/// Registration errors are collected and reported by [`Self::build`].
#[derive(Debug, Default)]
pub struct JsonSerializerBuilder {
    registrations: Vec<TypeRegistration>,
    converters: Option<Arc<ConverterRegistry>>,
    config: JsonSerializerConfig,
}

impl JsonSerializerBuilder {
    /// Adds a type registration.
    #[must_use]
    pub fn register(mut self, registration: TypeRegistration) -> Self {
        self.registrations.push(registration);
        self
    }

    /// Sets the serializer configuration.
    #[must_use]
    pub const fn with_config(mut self, config: JsonSerializerConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares an existing converter registry instead of creating one.
    ///
    /// On [`Self::build`] the JSON converters are added for edges the
    /// registry has no converter for yet. Converters the caller registered
    /// are kept, and building several serializers on one registry adds the
    /// defaults once.
    #[must_use]
    pub fn with_converters(mut self, converters: Arc<ConverterRegistry>) -> Self {
        self.converters = Some(converters);
        self
    }

    /// Builds the serializer.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::InvalidArgument`] if a registration is
    /// invalid or conflicts with another one.
    pub fn build(self) -> SerializationResult<JsonSerializer> {
        let mut types = TypeRegistry::new();
        for registration in self.registrations {
            types.register(registration)?;
        }
        let converters = match self.converters {
            Some(shared) => {
                converters::register_defaults(&shared);
                shared
            }
            None => default_converters(self.config.converters),
        };
        Ok(JsonSerializer {
            types,
            converters,
            config: self.config,
        })
    }
}

fn default_converters(config: ConverterConfig) -> Arc<ConverterRegistry> {
    let registry = ConverterRegistry::with_config(config);
    converters::register_defaults(&registry);
    Arc::new(registry)
}
