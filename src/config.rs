//! Tunable limits shared by the evaluator, the path cache, the object pool
//! and the text collaborators.

/// Default nesting limit for parsing, serialization and recursive descent.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Default number of compiled paths retained by a [`PathCache`].
///
/// [`PathCache`]: crate::PathCache
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// Default number of idle containers retained per kind by a [`ValuePool`].
///
/// [`ValuePool`]: crate::ValuePool
pub const DEFAULT_POOL_CAPACITY: usize = 256;

/// Default number of nulls `set` may pad an array with to reach an index.
pub const DEFAULT_MAX_ARRAY_GROWTH: usize = 1 << 16;

/// Runtime configuration.
///
/// ```rust
/// use jsonpath_dom::{Config, Evaluator, PathCache};
///
/// let config = Config::default().with_max_depth(32).with_cache_size(16);
/// let cache = PathCache::from_config(&config);
/// let evaluator = Evaluator::new(&config);
/// assert_eq!(cache.stats().max_size, 16);
/// assert_eq!(evaluator.max_depth(), 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum container nesting accepted by the parser and serializer, and
    /// the maximum depth walked by recursive descent.
    pub max_depth: usize,
    /// Maximum number of entries in a path cache.
    pub cache_size: usize,
    /// Maximum number of idle containers kept per kind in an object pool.
    pub pool_capacity: usize,
    /// Maximum number of elements `set` appends to an array to reach an
    /// index past its end.
    pub max_array_growth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            cache_size: DEFAULT_CACHE_SIZE,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            max_array_growth: DEFAULT_MAX_ARRAY_GROWTH,
        }
    }
}

impl Config {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    pub fn with_pool_capacity(mut self, pool_capacity: usize) -> Self {
        self.pool_capacity = pool_capacity;
        self
    }

    pub fn with_max_array_growth(mut self, max_array_growth: usize) -> Self {
        self.max_array_growth = max_array_growth;
        self
    }
}
