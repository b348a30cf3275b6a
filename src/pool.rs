//! Reuse of container allocations.

use std::sync::OnceLock;

use parking_lot::Mutex;
use tracing::trace;

use crate::config::{Config, DEFAULT_POOL_CAPACITY};
use crate::value::{Array, Object, Value};

static GLOBAL_POOL: OnceLock<ValuePool> = OnceLock::new();

/// Idle counts reported by [`ValuePool::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub idle_objects: usize,
    pub idle_arrays: usize,
    pub capacity: usize,
}

/// A pool of empty [`Object`]s and [`Array`]s.
///
/// Containers handed out are always empty. Containers put back are cleared
/// and kept, up to `capacity` per kind; the rest are dropped.
#[derive(Debug)]
pub struct ValuePool {
    objects: Mutex<Vec<Object>>,
    arrays: Mutex<Vec<Array>>,
    capacity: usize,
}

impl Default for ValuePool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl ValuePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            arrays: Mutex::new(Vec::new()),
            capacity,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pool_capacity)
    }

    /// Returns the process-wide pool, creating it on first use.
    pub fn global() -> &'static ValuePool {
        GLOBAL_POOL.get_or_init(ValuePool::default)
    }

    /// Takes an empty object from the pool, or allocates one.
    pub fn get_object(&self) -> Object {
        self.objects.lock().pop().unwrap_or_default()
    }

    pub fn put_object(&self, mut object: Object) {
        object.clear();
        let mut objects = self.objects.lock();
        if objects.len() < self.capacity {
            objects.push(object);
        } else {
            trace!(capacity = self.capacity, "object pool full, dropping");
        }
    }

    /// Takes an empty array from the pool, or allocates one.
    pub fn get_array(&self) -> Array {
        self.arrays.lock().pop().unwrap_or_default()
    }

    pub fn put_array(&self, mut array: Array) {
        array.clear();
        let mut arrays = self.arrays.lock();
        if arrays.len() < self.capacity {
            arrays.push(array);
        } else {
            trace!(capacity = self.capacity, "array pool full, dropping");
        }
    }

    /// Returns a value's top-level container to the pool. Scalars are dropped.
    ///
    /// Nested containers are dropped with their parent.
    pub fn put_value(&self, value: Value) {
        match value {
            Value::Object(object) => self.put_object(object),
            Value::Array(array) => self.put_array(array),
            _ => {}
        }
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            idle_objects: self.objects.lock().len(),
            idle_arrays: self.arrays.lock().len(),
            capacity: self.capacity,
        }
    }
}
