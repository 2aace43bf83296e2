//! Registry of content type converters and the chain resolver built on it.
//!
//! Registered converters are the edges of a directed graph whose nodes are
//! representation types. Resolving a `(source, target)` pair is a
//! breadth-first search over that graph, so the chain with the fewest hops
//! wins and a direct converter always beats a multi-hop path.

use super::chain::{ChainedConverter, IdentityConverter};
use crate::serialization::{
    domain::{RepresentationType, SerializedObject},
    error::{SerializationError, SerializationResult},
    ports::ContentTypeConverter,
};
use std::any::Any;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

type ChainKey = (RepresentationType, RepresentationType);

/// Configuration for converter chain resolution.
///
/// # Examples
///
/// ```
/// use missive::serialization::services::ConverterConfig;
///
/// let config = ConverterConfig::default();
/// assert!(config.cache_chains);
/// assert_eq!(config.max_chain_length, 8);
///
/// assert!(!ConverterConfig::uncached().cache_chains);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Longest chain, in hops, that resolution will consider.
    pub max_chain_length: usize,
    /// Whether resolved chains are cached per `(source, target)` pair.
    pub cache_chains: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            max_chain_length: 8,
            cache_chains: true,
        }
    }
}

impl ConverterConfig {
    /// Creates a configuration that resolves every request from scratch.
    ///
    /// Useful when converters are registered and removed frequently in tests.
    #[must_use]
    pub fn uncached() -> Self {
        Self {
            cache_chains: false,
            ..Self::default()
        }
    }
}

/// Resolves converters between arbitrary representation types.
///
/// A converter registered for an edge that already has one replaces it, so
/// the registry holds at most one converter per `(source, target)` pair. The
/// chain cache is read-mostly; two callers missing the cache for the same pair
/// may both compute the chain, and either result is kept. A chain resolved
/// before a registration is never cached after it.
///
/// # Examples
///
/// ```
/// use missive::serialization::domain::RepresentationType;
/// use missive::serialization::ports::FnConverter;
/// use missive::serialization::services::ConverterRegistry;
///
/// let registry = ConverterRegistry::new();
/// registry.register(FnConverter::new(|n: &u8| Ok(u16::from(*n))));
/// registry.register(FnConverter::new(|n: &u16| Ok(u32::from(*n))));
///
/// let chain = registry
///     .converter(RepresentationType::of::<u8>(), RepresentationType::of::<u32>())
///     .expect("two-hop chain");
/// assert!(chain.target_type().is::<u32>());
/// ```
pub struct ConverterRegistry {
    config: ConverterConfig,
    converters: RwLock<Vec<Arc<dyn ContentTypeConverter>>>,
    chains: RwLock<HashMap<ChainKey, Arc<dyn ContentTypeConverter>>>,
    generation: AtomicU64,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_config(ConverterConfig::default())
    }
}

impl ConverterRegistry {
    /// Creates an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given configuration.
    #[must_use]
    pub fn with_config(config: ConverterConfig) -> Self {
        Self {
            config,
            converters: RwLock::new(Vec::new()),
            chains: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Registers a single-hop converter.
    pub fn register(&self, converter: impl ContentTypeConverter + 'static) {
        self.register_shared(Arc::new(converter));
    }

    /// Registers a shared single-hop converter.
    ///
    /// Replaces any converter registered for the same edge and clears the
    /// chain cache.
    pub fn register_shared(&self, converter: Arc<dyn ContentTypeConverter>) {
        let edge = (converter.source_type(), converter.target_type());
        debug!(
            source = %edge.0,
            target = %edge.1,
            "registering content type converter"
        );
        {
            let mut converters = self
                .converters
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            converters.retain(|existing| endpoints(existing.as_ref()) != edge);
            converters.insert(0, converter);
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
        self.chains
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Registers a converter unless its edge already has one.
    ///
    /// Returns `true` if the converter was registered. An existing converter
    /// and the chain cache are left untouched otherwise.
    pub fn register_if_absent(&self, converter: impl ContentTypeConverter + 'static) -> bool {
        let edge = (converter.source_type(), converter.target_type());
        if self.has_edge(edge) {
            return false;
        }
        self.register(converter);
        true
    }

    /// Returns `true` if a single-hop converter is registered from `source`
    /// to `target`.
    #[must_use]
    pub fn has_direct_converter(
        &self,
        source: RepresentationType,
        target: RepresentationType,
    ) -> bool {
        self.has_edge((source, target))
    }

    fn has_edge(&self, edge: ChainKey) -> bool {
        self.converters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|existing| endpoints(existing.as_ref()) == edge)
    }

    /// Returns the number of registered single-hop converters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no converters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if a chain from `source` to `target` exists.
    #[must_use]
    pub fn has_converter(&self, source: RepresentationType, target: RepresentationType) -> bool {
        self.converter(source, target).is_ok()
    }

    /// Resolves a converter from `source` to `target`.
    ///
    /// Returns an identity converter when the two coincide, the registered
    /// converter when a direct edge exists, and otherwise the shortest chain.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::NoConverterPath`] if no chain of at most
    /// `max_chain_length` hops exists.
    pub fn converter(
        &self,
        source: RepresentationType,
        target: RepresentationType,
    ) -> SerializationResult<Arc<dyn ContentTypeConverter>> {
        if source == target {
            let identity: Arc<dyn ContentTypeConverter> =
                Arc::new(IdentityConverter::new(source));
            return Ok(identity);
        }
        if self.config.cache_chains
            && let Some(cached) = self
                .chains
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&(source, target))
        {
            return Ok(Arc::clone(cached));
        }

        let (resolved, generation) = self.resolve(source, target)?;
        if self.config.cache_chains {
            let mut chains = self.chains.write().unwrap_or_else(PoisonError::into_inner);
            if self.generation.load(Ordering::Acquire) == generation {
                chains.insert((source, target), Arc::clone(&resolved));
            } else {
                debug!(
                    %source,
                    %target,
                    "converters changed during resolution; chain not cached"
                );
            }
        }
        Ok(resolved)
    }

    /// Converts `original` into the `target` representation.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::NoConverterPath`] if no chain exists, or
    /// any error raised by a hop.
    pub fn convert(
        &self,
        original: &SerializedObject,
        target: RepresentationType,
    ) -> SerializationResult<SerializedObject> {
        self.converter(original.representation_type(), target)?
            .convert(original)
    }

    /// Converts `original` into representation `R`.
    ///
    /// # Errors
    ///
    /// See [`ConverterRegistry::convert`].
    pub fn convert_to<R: Any>(
        &self,
        original: &SerializedObject,
    ) -> SerializationResult<SerializedObject> {
        self.convert(original, RepresentationType::of::<R>())
    }

    /// Resolves a chain against a snapshot of the edges, returning it with
    /// the generation the snapshot was taken at.
    fn resolve(
        &self,
        source: RepresentationType,
        target: RepresentationType,
    ) -> SerializationResult<(Arc<dyn ContentTypeConverter>, u64)> {
        let (edges, generation) = {
            let converters = self
                .converters
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            (converters.clone(), self.generation.load(Ordering::Acquire))
        };

        let Some(mut hops) = shortest_path(&edges, source, target, self.config.max_chain_length)
        else {
            debug!(%source, %target, "no converter path");
            return Err(SerializationError::NoConverterPath {
                from: source,
                to: target,
            });
        };
        debug!(%source, %target, hops = hops.len(), "resolved converter chain");

        if hops.len() == 1
            && let Some(direct) = hops.pop()
        {
            return Ok((direct, generation));
        }
        let chained: Arc<dyn ContentTypeConverter> = Arc::new(ChainedConverter::new(hops)?);
        Ok((chained, generation))
    }
}

fn endpoints(converter: &dyn ContentTypeConverter) -> ChainKey {
    (converter.source_type(), converter.target_type())
}

/// Breadth-first search for the shortest converter path.
///
/// `edges` is scanned in order at every node, so earlier entries win ties.
fn shortest_path(
    edges: &[Arc<dyn ContentTypeConverter>],
    source: RepresentationType,
    target: RepresentationType,
    max_hops: usize,
) -> Option<Vec<Arc<dyn ContentTypeConverter>>> {
    let mut visited = HashSet::from([source]);
    let mut queue = VecDeque::from([(source, Vec::new())]);

    while let Some((node, path)) = queue.pop_front() {
        if path.len() >= max_hops {
            continue;
        }
        for edge in edges.iter().filter(|edge| edge.source_type() == node) {
            let next = edge.target_type();
            if !visited.insert(next) {
                continue;
            }
            let mut extended: Vec<Arc<dyn ContentTypeConverter>> = path.clone();
            extended.push(Arc::clone(edge));
            if next == target {
                return Some(extended);
            }
            queue.push_back((next, extended));
        }
    }
    None
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("config", &self.config)
            .field("converters", &self.len())
            .finish_non_exhaustive()
    }
}
