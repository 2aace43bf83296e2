//! Composite converters produced by chain resolution.

use crate::serialization::{
    domain::{RepresentationType, SerializedData},
    error::{SerializationError, SerializationResult},
    ports::ContentTypeConverter,
};
use std::fmt;
use std::sync::Arc;

/// Pass-through converter used when source and target coincide.
#[derive(Debug, Clone, Copy)]
pub struct IdentityConverter {
    representation: RepresentationType,
}

impl IdentityConverter {
    /// Creates an identity converter for `representation`.
    #[must_use]
    pub const fn new(representation: RepresentationType) -> Self {
        Self { representation }
    }
}

impl ContentTypeConverter for IdentityConverter {
    fn source_type(&self) -> RepresentationType {
        self.representation
    }

    fn target_type(&self) -> RepresentationType {
        self.representation
    }

    fn convert_data(&self, data: SerializedData) -> SerializationResult<SerializedData> {
        Ok(data)
    }
}

/// A sequence of single-hop converters applied in order.
///
/// The chain's endpoints are the first hop's source and the last hop's
/// target; intermediate representations are never exposed.
#[derive(Clone)]
pub struct ChainedConverter {
    hops: Vec<Arc<dyn ContentTypeConverter>>,
    source: RepresentationType,
    target: RepresentationType,
}

impl ChainedConverter {
    /// Composes `hops` into one converter.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::InvalidArgument`] if `hops` is empty or
    /// if a hop's source does not match the previous hop's target.
    pub fn new(hops: Vec<Arc<dyn ContentTypeConverter>>) -> SerializationResult<Self> {
        let (Some(first), Some(last)) = (hops.first(), hops.last()) else {
            return Err(SerializationError::invalid_argument(
                "a converter chain needs at least one hop",
            ));
        };
        let (source, target) = (first.source_type(), last.target_type());
        let linked = hops
            .windows(2)
            .all(|pair| matches!(pair, [a, b] if a.target_type() == b.source_type()));
        if !linked {
            return Err(SerializationError::invalid_argument(
                "adjacent converters in a chain must share a representation",
            ));
        }
        Ok(Self {
            hops,
            source,
            target,
        })
    }

    /// Returns the number of single-hop conversions in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Always `false`: chains have at least one hop.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Returns the representations visited, endpoints included.
    #[must_use]
    pub fn path(&self) -> Vec<RepresentationType> {
        std::iter::once(self.source)
            .chain(self.hops.iter().map(|hop| hop.target_type()))
            .collect()
    }
}

impl ContentTypeConverter for ChainedConverter {
    fn source_type(&self) -> RepresentationType {
        self.source
    }

    fn target_type(&self) -> RepresentationType {
        self.target
    }

    fn convert_data(&self, data: SerializedData) -> SerializationResult<SerializedData> {
        self.hops
            .iter()
            .try_fold(data, |current, hop| hop.convert_data(current))
    }
}

impl fmt::Debug for ChainedConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedConverter")
            .field("path", &self.path())
            .finish()
    }
}
