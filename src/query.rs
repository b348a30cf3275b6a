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

//! Path-string API.
//!
//! These functions compile their path through the process-wide
//! [`PathCache`] and accept an optional root, so that an absent document is
//! reported as [`Error::NilRoot`] instead of requiring a value.
//!
//! The `must_*` variants never fail: on any error they return the documented
//! default of their result type.

use std::borrow::Cow;
use std::sync::Arc;

use crate::ast::CompiledPath;
use crate::cache::{CacheStats, PathCache};
use crate::error::{Error, Result};
use crate::eval::{Evaluator, NodePredicate};
use crate::value::{Array, Object, Value};

/// Compiles `path` through the process-wide cache.
pub fn compile(path: &str) -> Result<Arc<CompiledPath>> {
    Ok(PathCache::global().compile(path)?)
}

/// Returns the first node matched by `path`.
pub fn get<'a>(root: impl Into<Option<&'a Value>>, path: &str) -> Result<&'a Value> {
    let root = root.into().ok_or(Error::NilRoot)?;
    let path = compile(path)?;
    Evaluator::default().get(&path, root)
}

/// Returns every node matched by `path`, in document order.
pub fn get_all<'a>(root: impl Into<Option<&'a Value>>, path: &str) -> Result<Vec<&'a Value>> {
    let root = root.into().ok_or(Error::NilRoot)?;
    let path = compile(path)?;
    Evaluator::default().get_all(&path, root)
}

/// Checks whether [`get_all`] returns any node. Never fails.
pub fn exists<'a>(root: impl Into<Option<&'a Value>>, path: &str) -> bool {
    count(root, path) > 0
}

/// Counts the nodes matched by `path`. Never fails.
pub fn count<'a>(root: impl Into<Option<&'a Value>>, path: &str) -> usize {
    get_all(root, path).map_or(0, |nodes| nodes.len())
}

/// Sets the value at `path`, creating missing intermediate containers.
pub fn set<'a>(
    root: impl Into<Option<&'a mut Value>>,
    path: &str,
    value: impl Into<Value>,
) -> Result<()> {
    let root = root.into().ok_or(Error::NilRoot)?;
    let path = compile(path)?;
    Evaluator::default().set(&path, root, value.into())
}

/// Deletes the nodes addressed by `path`.
pub fn delete<'a>(root: impl Into<Option<&'a mut Value>>, path: &str) -> Result<()> {
    let root = root.into().ok_or(Error::NilRoot)?;
    let path = compile(path)?;
    Evaluator::default().delete(&path, root)
}

/// Returns the nodes matched by `path` that satisfy `predicate`.
///
/// ```rust
/// use jsonpath_dom::{query, Value};
///
/// let doc: Value = r#"{"n": [1, 5, 10]}"#.parse().unwrap();
/// let big = query::filter(&doc, "$.n[*]", Some(&|v: &Value| v.as_f64().unwrap_or(0.0) > 3.0)).unwrap();
/// assert_eq!(big.len(), 2);
/// assert!(query::filter(&doc, "$.n[*]", None).is_err());
/// ```
pub fn filter<'a>(
    root: impl Into<Option<&'a Value>>,
    path: &str,
    predicate: Option<NodePredicate<'_>>,
) -> Result<Vec<&'a Value>> {
    let root = root.into().ok_or(Error::NilRoot)?;
    let predicate = predicate.ok_or(Error::PredicateNil)?;
    let path = compile(path)?;
    Evaluator::default().filter(&path, root, Some(predicate))
}

/// Like [`filter`], but returns an empty `Vec` on any error.
pub fn must_filter<'a>(
    root: impl Into<Option<&'a Value>>,
    path: &str,
    predicate: Option<NodePredicate<'_>>,
) -> Vec<&'a Value> {
    filter(root, path, predicate).unwrap_or_default()
}

/// Like [`get_all`], but returns an empty `Vec` on any error.
pub fn must_get_all<'a>(root: impl Into<Option<&'a Value>>, path: &str) -> Vec<&'a Value> {
    get_all(root, path).unwrap_or_default()
}

/// Like [`get`], but returns `null` on any error.
pub fn must_get<'a>(root: impl Into<Option<&'a Value>>, path: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    get(root, path).unwrap_or(&NULL)
}

/// Returns the string at `path`, or `""`.
pub fn must_get_str<'a>(root: impl Into<Option<&'a Value>>, path: &str) -> &'a str {
    get(root, path)
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// Returns the integer at `path`, or `0`.
pub fn must_get_i64<'a>(root: impl Into<Option<&'a Value>>, path: &str) -> i64 {
    get(root, path).and_then(Value::as_i64).unwrap_or_default()
}

/// Returns the number at `path`, or `0.0`.
pub fn must_get_f64<'a>(root: impl Into<Option<&'a Value>>, path: &str) -> f64 {
    get(root, path).and_then(Value::as_f64).unwrap_or_default()
}

/// Returns the boolean at `path`, or `false`.
pub fn must_get_bool<'a>(root: impl Into<Option<&'a Value>>, path: &str) -> bool {
    get(root, path).and_then(Value::as_bool).unwrap_or_default()
}

/// Returns the object at `path`, or an empty object.
pub fn must_get_object<'a>(root: impl Into<Option<&'a Value>>, path: &str) -> Cow<'a, Object> {
    match get(root, path).ok().and_then(Value::as_object) {
        Some(object) => Cow::Borrowed(object),
        None => Cow::Owned(Object::new()),
    }
}

/// Returns the array at `path`, or an empty array.
pub fn must_get_array<'a>(root: impl Into<Option<&'a Value>>, path: &str) -> Cow<'a, Array> {
    match get(root, path).ok().and_then(Value::as_array) {
        Some(array) => Cow::Borrowed(array),
        None => Cow::Owned(Array::new()),
    }
}

/// Returns the size of the process-wide path cache.
pub fn cache_stats() -> CacheStats {
    PathCache::global().stats()
}

pub fn set_cache_max_size(max_size: usize) {
    PathCache::global().set_max_size(max_size);
}

pub fn clear_cache() {
    PathCache::global().clear();
}
