// Copyright 2023 RisingWave Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A bounded, thread-safe cache of compiled paths.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::ast::CompiledPath;
use crate::config::{Config, DEFAULT_CACHE_SIZE};
use crate::parser::Error as ParseError;

/// Process-wide default cache.
static GLOBAL_CACHE: OnceLock<PathCache> = OnceLock::new();

/// Size information reported by [`PathCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached paths.
    pub size: usize,
    /// Maximum number of cached paths.
    pub max_size: usize,
}

/// A bounded map from path text to its [`CompiledPath`].
///
/// Every caller compiling the same string receives the same `Arc` while the
/// entry is cached. When the cache is full the oldest entries are evicted.
/// A maximum size of zero disables caching.
#[derive(Debug)]
pub struct PathCache {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    entries: IndexMap<Box<str>, Arc<CompiledPath>>,
    max_size: usize,
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl PathCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: IndexMap::new(),
                max_size,
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_size)
    }

    /// Returns the process-wide cache, creating it on first use.
    pub fn global() -> &'static PathCache {
        GLOBAL_CACHE.get_or_init(PathCache::default)
    }

    /// Compiles `path`, or returns the cached instance.
    pub fn compile(&self, path: &str) -> Result<Arc<CompiledPath>, ParseError> {
        if let Some(compiled) = self.inner.read().entries.get(path) {
            trace!(path, "path cache hit");
            return Ok(compiled.clone());
        }

        // compile outside the lock; failed paths are never cached
        let compiled = CompiledPath::compile(path).map_err(|e| {
            debug!(path, error = %e, "rejected path");
            e
        })?;

        let mut inner = self.inner.write();
        // another thread may have won the race while we were compiling
        if let Some(existing) = inner.entries.get(path) {
            return Ok(existing.clone());
        }
        let compiled = Arc::new(compiled);
        if inner.max_size == 0 {
            return Ok(compiled);
        }
        while inner.entries.len() >= inner.max_size {
            if let Some((evicted, _)) = inner.entries.shift_remove_index(0) {
                debug!(path = &*evicted, "evicted compiled path");
            }
        }
        debug!(path, size = inner.entries.len() + 1, "path cache miss");
        inner.entries.insert(path.into(), compiled.clone());
        Ok(compiled)
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.read();
        CacheStats {
            size: inner.entries.len(),
            max_size: inner.max_size,
        }
    }

    /// Changes the maximum size. Existing entries are kept; the new bound
    /// applies from the next insertion.
    pub fn set_max_size(&self, max_size: usize) {
        let mut inner = self.inner.write();
        debug!(from = inner.max_size, to = max_size, "resized path cache");
        inner.max_size = max_size;
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        debug!(size = inner.entries.len(), "cleared path cache");
        inner.entries.clear();
    }
}
