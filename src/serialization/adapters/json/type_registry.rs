//! Registry mapping logical type names to Rust types for the JSON codec.

use crate::message::domain::MetaData;
use crate::serialization::{
    domain::{KnownType, ResolvedType, SerializedType},
    error::{SerializationError, SerializationResult, ensure_argument},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

type EncodeFn = fn(&(dyn Any + Send + Sync)) -> SerializationResult<Value>;
type DecodeFn = fn(Value, &SerializedType) -> SerializationResult<Box<dyn Any + Send + Sync>>;

/// Binds a logical type name (and optional revision) to a Rust type.
///
/// The revision replaces a type-level revision annotation: it is declared
/// once, here, and stamped on every value the codec serializes.
///
/// # Examples
///
/// ```
/// use missive::serialization::adapters::json::TypeRegistration;
///
/// let registration = TypeRegistration::of::<String>("note").with_revision("2");
/// assert_eq!(registration.serialized_type().revision(), Some("2"));
/// ```
#[derive(Clone)]
pub struct TypeRegistration {
    serialized_type: SerializedType,
    known_type: KnownType,
    encode: EncodeFn,
    decode: DecodeFn,
}

impl TypeRegistration {
    /// Registers `T` under the logical name `name`, without a revision.
    #[must_use]
    pub fn of<T>(name: impl Into<String>) -> Self
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        Self {
            serialized_type: SerializedType::unrevisioned(name),
            known_type: KnownType::of::<T>(),
            encode: encode_value::<T>,
            decode: decode_value::<T>,
        }
    }

    /// Sets the revision stamped on serialized values.
    #[must_use]
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        let revision = revision.into();
        self.serialized_type = SerializedType::new(self.serialized_type.name(), Some(&revision));
        self
    }

    /// Returns the logical type written on serialization.
    #[must_use]
    pub const fn serialized_type(&self) -> &SerializedType {
        &self.serialized_type
    }

    /// Returns the Rust type bound to the name.
    #[must_use]
    pub const fn known_type(&self) -> KnownType {
        self.known_type
    }

    pub(super) fn encode(&self, object: &(dyn Any + Send + Sync)) -> SerializationResult<Value> {
        (self.encode)(object)
    }

    pub(super) fn decode(
        &self,
        document: Value,
        serialized_type: &SerializedType,
    ) -> SerializationResult<Box<dyn Any + Send + Sync>> {
        (self.decode)(document, serialized_type)
    }
}

impl fmt::Debug for TypeRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistration")
            .field("serialized_type", &self.serialized_type)
            .field("known_type", &self.known_type.name())
            .finish_non_exhaustive()
    }
}

fn encode_value<T: Serialize + 'static>(
    object: &(dyn Any + Send + Sync),
) -> SerializationResult<Value> {
    let typed = object
        .downcast_ref::<T>()
        .ok_or_else(|| SerializationError::UnregisteredType(type_name::<T>().to_owned()))?;
    serde_json::to_value(typed).map_err(|err| SerializationError::serialize_failed(type_name::<T>(), err))
}

fn decode_value<T: DeserializeOwned + Send + Sync + 'static>(
    document: Value,
    serialized_type: &SerializedType,
) -> SerializationResult<Box<dyn Any + Send + Sync>> {
    let typed: T = serde_json::from_value(document)
        .map_err(|err| SerializationError::deserialize_failed(serialized_type, err))?;
    Ok(Box::new(typed))
}

/// Registry of the types a [`super::JsonSerializer`] can encode and decode.
///
/// Each logical name maps to exactly one Rust type and each Rust type to
/// exactly one logical name.
///
/// # Examples
///
/// ```
/// use missive::serialization::adapters::json::{TypeRegistration, TypeRegistry};
/// use missive::serialization::domain::SerializedType;
///
/// let mut registry = TypeRegistry::new();
/// registry
///     .register(TypeRegistration::of::<u64>("counter"))
///     .expect("unique name");
///
/// assert!(registry.resolve(&SerializedType::unrevisioned("counter")).is::<u64>());
/// assert!(registry.resolve(&SerializedType::unrevisioned("missing")).is_unknown());
/// ```
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    by_name: HashMap<String, TypeRegistration>,
    names_by_type: HashMap<TypeId, String>,
}

impl TypeRegistry {
    /// Creates a registry that already knows [`MetaData`].
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        let metadata = TypeRegistration::of::<MetaData>(MetaData::SERIALIZED_TYPE_NAME);
        registry
            .names_by_type
            .insert(metadata.known_type().id(), MetaData::SERIALIZED_TYPE_NAME.to_owned());
        registry
            .by_name
            .insert(MetaData::SERIALIZED_TYPE_NAME.to_owned(), metadata);
        registry
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers a type.
    ///
    /// Registering the same name for the same Rust type again replaces the
    /// earlier registration, which is how a revision is bumped.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::InvalidArgument`] if the name is blank,
    /// the name is bound to another Rust type, or the Rust type is bound to
    /// another name.
    pub fn register(&mut self, registration: TypeRegistration) -> SerializationResult<()> {
        let name = registration.serialized_type().name().to_owned();
        let type_id = registration.known_type().id();
        ensure_argument(
            !registration.serialized_type().is_blank(),
            "a registered type needs a non-blank name",
        )?;
        if let Some(existing) = self.by_name.get(&name)
            && existing.known_type().id() != type_id
        {
            return Err(SerializationError::invalid_argument(format!(
                "type name '{name}' is already bound to {}",
                existing.known_type().name()
            )));
        }
        if let Some(existing_name) = self.names_by_type.get(&type_id)
            && *existing_name != name
        {
            return Err(SerializationError::invalid_argument(format!(
                "{} is already registered as '{existing_name}'",
                registration.known_type().name()
            )));
        }
        self.names_by_type.insert(type_id, name.clone());
        self.by_name.insert(name, registration);
        Ok(())
    }

    /// Returns the registration for a logical name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&TypeRegistration> {
        self.by_name.get(name)
    }

    /// Returns the registration for a Rust type.
    #[must_use]
    pub fn by_type(&self, type_id: TypeId) -> Option<&TypeRegistration> {
        self.names_by_type
            .get(&type_id)
            .and_then(|name| self.by_name.get(name))
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Resolves a logical type without failing.
    ///
    /// Unknown names are logged at warn level and reported as
    /// [`ResolvedType::Unknown`]. Revisions are not compared.
    #[must_use]
    pub fn resolve(&self, serialized_type: &SerializedType) -> ResolvedType {
        match self.by_name.get(serialized_type.name()) {
            Some(registration) => ResolvedType::Known(registration.known_type()),
            None => {
                warn!(
                    serialized_type = %serialized_type,
                    "unable to resolve serialized type; treating it as unknown"
                );
                ResolvedType::Unknown(serialized_type.clone())
            }
        }
    }
}
