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

use std::ops::ControlFlow;

use tracing::trace;

use crate::ast::{CompiledPath, Segment};
use crate::config::{Config, DEFAULT_MAX_ARRAY_GROWTH, DEFAULT_MAX_DEPTH};
use crate::error::{Error, Result};
use crate::value::{Array, Kind, Object, Value};

/// A caller-supplied node predicate for [`Evaluator::filter`].
pub type NodePredicate<'p> = &'p dyn Fn(&Value) -> bool;

/// Evaluates compiled paths against documents.
///
/// Reads borrow the document immutably and may run concurrently. Mutations
/// require `&mut Value`, so concurrent writers must be serialized by the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    /// Maximum depth walked by recursive descent.
    max_depth: usize,
    /// Maximum number of nulls `set` pads an array with.
    max_array_growth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_growth: DEFAULT_MAX_ARRAY_GROWTH,
        }
    }
}

impl Evaluator {
    pub fn new(config: &Config) -> Self {
        Self {
            max_depth: config.max_depth,
            max_array_growth: config.max_array_growth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the first match in traversal order.
    pub fn get<'a>(&self, path: &CompiledPath, root: &'a Value) -> Result<&'a Value> {
        let mut out = Vec::with_capacity(1);
        self.walker(true).walk(root, &path.segments, 0, &mut out)?;
        out.into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(path.path.clone()))
    }

    /// Returns every match in depth-first pre-order.
    pub fn get_all<'a>(&self, path: &CompiledPath, root: &'a Value) -> Result<Vec<&'a Value>> {
        let mut out = vec![];
        self.walker(false)
            .walk(root, &path.segments, 0, &mut out)?;
        Ok(out)
    }

    /// Checks whether [`get_all`](Self::get_all) would return any node.
    pub fn exists(&self, path: &CompiledPath, root: &Value) -> bool {
        self.count(path, root) > 0
    }

    pub fn count(&self, path: &CompiledPath, root: &Value) -> usize {
        self.get_all(path, root).map_or(0, |nodes| nodes.len())
    }

    /// Returns the matches of `path` for which `predicate` holds, in order.
    pub fn filter<'a>(
        &self,
        path: &CompiledPath,
        root: &'a Value,
        predicate: Option<NodePredicate<'_>>,
    ) -> Result<Vec<&'a Value>> {
        let predicate = predicate.ok_or(Error::PredicateNil)?;
        let mut nodes = self.get_all(path, root)?;
        nodes.retain(|node| predicate(node));
        Ok(nodes)
    }

    /// Sets the value at `path`, creating missing intermediate containers.
    ///
    /// A failed call leaves no created containers behind. A null root is
    /// a type mismatch rather than a missing node.
    pub fn set(&self, path: &CompiledPath, root: &mut Value, value: Value) -> Result<()> {
        let Some(first) = path.segments.first() else {
            return Err(Error::RootMutation);
        };
        // the root belongs to the caller and is never replaced by a container
        if root.is_null() {
            return Err(mismatch(first, Kind::Null));
        }
        match self.set_in(root, &path.segments, &value)? {
            0 => Err(Error::NotFound(path.path.clone())),
            _ => Ok(()),
        }
    }

    /// Removes every node addressed by `path`.
    pub fn delete(&self, path: &CompiledPath, root: &mut Value) -> Result<()> {
        if path.is_root() {
            return Err(Error::RootMutation);
        }
        match self.delete_in(root, &path.segments, 0)? {
            0 => Err(Error::NotFound(path.path.clone())),
            _ => Ok(()),
        }
    }

    fn walker(&self, first: bool) -> Walker {
        Walker {
            max_depth: self.max_depth,
            first,
        }
    }

    /// Returns the number of nodes assigned.
    fn set_in(&self, node: &mut Value, segments: &[Segment], value: &Value) -> Result<usize> {
        let Some((segment, rest)) = segments.split_first() else {
            *node = value.clone();
            return Ok(1);
        };
        let vivified = node.is_null() && vivify(node, segment);
        let assigned = self.set_step(node, segment, rest, value);
        if vivified && !assigned_any(&assigned) {
            *node = Value::Null;
        }
        assigned
    }

    fn set_step(
        &self,
        node: &mut Value,
        segment: &Segment,
        rest: &[Segment],
        value: &Value,
    ) -> Result<usize> {
        match segment {
            Segment::Property(name) => {
                let found = node.kind();
                let Value::Object(object) = node else {
                    return Err(mismatch(segment, found));
                };
                let inserted = !object.has(name);
                if inserted && !can_create(rest) {
                    return Ok(0);
                }
                let child = object.get_or_insert_with(name, || Value::Null);
                let assigned = self.set_in(child, rest, value);
                if inserted && !assigned_any(&assigned) {
                    let _ = object.delete(name);
                }
                assigned
            }
            Segment::Index(index) => {
                let found = node.kind();
                let Value::Array(array) = node else {
                    return Err(mismatch(segment, found));
                };
                let len = array.len();
                let out_of_bounds = || Error::IndexOutOfBounds { index: *index, len };
                let slot = match resolve_index(len, *index) {
                    Some(i) if i < len => i,
                    Some(i) if can_create(rest) => {
                        if i - len >= self.max_array_growth {
                            return Err(out_of_bounds());
                        }
                        array.extend_to(i).map_err(|_| out_of_bounds())?;
                        i
                    }
                    Some(_) => return Ok(0),
                    None => return Err(out_of_bounds()),
                };
                let child = array.get_mut(slot).ok_or_else(out_of_bounds)?;
                let assigned = self.set_in(child, rest, value);
                if !assigned_any(&assigned) {
                    array.truncate(len);
                }
                assigned
            }
            Segment::Wildcard => self.set_each(node, segment, rest, value),
            Segment::Filter(_) => self.set_each(node, segment, rest, value),
            Segment::RecursiveDescent => Err(Error::UnsupportedMutation(segment.to_string().into())),
        }
    }

    /// Fans a mutation out over the existing children selected by `segment`.
    fn set_each(
        &self,
        node: &mut Value,
        segment: &Segment,
        rest: &[Segment],
        value: &Value,
    ) -> Result<usize> {
        if !matches!(node, Value::Null | Value::Array(_) | Value::Object(_)) {
            return Err(mismatch(segment, node.kind()));
        }
        let mut count = 0;
        for child in node.children_mut() {
            if let Segment::Filter(pred) = segment {
                if !pred.matches(child) {
                    continue;
                }
            }
            count += self.set_in(child, rest, value)?;
        }
        Ok(count)
    }

    /// Returns the number of nodes removed.
    fn delete_in(&self, node: &mut Value, segments: &[Segment], depth: usize) -> Result<usize> {
        let Some((segment, rest)) = segments.split_first() else {
            return Ok(0);
        };
        if rest.is_empty() {
            return Ok(match segment {
                Segment::Property(name) => node
                    .as_object_mut()
                    .map_or(0, |object| usize::from(object.delete(name).is_ok())),
                Segment::Index(index) => node.as_array_mut().map_or(0, |array| {
                    resolve_index(array.len(), *index)
                        .map_or(0, |i| usize::from(array.remove(i).is_ok()))
                }),
                Segment::Wildcard => remove_children(node, |_| true),
                Segment::Filter(pred) => remove_children(node, |child| pred.matches(child)),
                // the compiler never emits a trailing descent
                Segment::RecursiveDescent => 0,
            });
        }
        match segment {
            Segment::Property(name) => match node.as_object_mut().and_then(|o| o.get_mut(name)) {
                Some(child) => self.delete_in(child, rest, depth),
                None => Ok(0),
            },
            Segment::Index(index) => {
                let Some(array) = node.as_array_mut() else {
                    return Ok(0);
                };
                match resolve_index(array.len(), *index).and_then(|i| array.get_mut(i)) {
                    Some(child) => self.delete_in(child, rest, depth),
                    None => Ok(0),
                }
            }
            Segment::Wildcard | Segment::Filter(_) => {
                let mut removed = 0;
                for child in node.children_mut() {
                    if let Segment::Filter(pred) = segment {
                        if !pred.matches(child) {
                            continue;
                        }
                    }
                    removed += self.delete_in(child, rest, depth)?;
                }
                Ok(removed)
            }
            Segment::RecursiveDescent => self.delete_descend(node, rest, depth),
        }
    }

    fn delete_descend(&self, node: &mut Value, rest: &[Segment], depth: usize) -> Result<usize> {
        if depth > self.max_depth {
            return Err(Error::MaxDepth(self.max_depth));
        }
        let mut removed = self.delete_in(node, rest, depth)?;
        for child in node.children_mut() {
            removed += self.delete_descend(child, rest, depth + 1)?;
        }
        Ok(removed)
    }
}

/// Read traversal context.
#[derive(Debug, Clone, Copy)]
struct Walker {
    max_depth: usize,
    /// Only collect the first result.
    first: bool,
}

/// Propagates errors and stops the walk once the first result is found.
macro_rules! walk {
    ($expr:expr) => {
        if let ControlFlow::Break(()) = $expr? {
            return Ok(ControlFlow::Break(()));
        }
    };
}

impl Walker {
    fn walk<'a>(
        &self,
        node: &'a Value,
        segments: &[Segment],
        depth: usize,
        out: &mut Vec<&'a Value>,
    ) -> Result<ControlFlow<()>> {
        let Some((segment, rest)) = segments.split_first() else {
            out.push(node);
            if self.first {
                return Ok(ControlFlow::Break(()));
            }
            return Ok(ControlFlow::Continue(()));
        };
        match segment {
            Segment::Property(name) => {
                if let Some(child) = node.as_object().and_then(|object| object.get(name)) {
                    walk!(self.walk(child, rest, depth, out));
                }
            }
            Segment::Index(index) => {
                if let Some(array) = node.as_array() {
                    if let Some(child) = resolve_index(array.len(), *index).and_then(|i| array.get(i)) {
                        walk!(self.walk(child, rest, depth, out));
                    }
                }
            }
            Segment::Wildcard => {
                for child in node.children() {
                    walk!(self.walk(child, rest, depth, out));
                }
            }
            Segment::RecursiveDescent => walk!(self.descend(node, rest, depth, out)),
            Segment::Filter(pred) => {
                for child in node.children().filter(|child| pred.matches(child)) {
                    walk!(self.walk(child, rest, depth, out));
                }
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Applies `rest` to `node` and then to each descendant, in pre-order.
    fn descend<'a>(
        &self,
        node: &'a Value,
        rest: &[Segment],
        depth: usize,
        out: &mut Vec<&'a Value>,
    ) -> Result<ControlFlow<()>> {
        if depth > self.max_depth {
            return Err(Error::MaxDepth(self.max_depth));
        }
        walk!(self.walk(node, rest, depth, out));
        for child in node.children() {
            walk!(self.descend(child, rest, depth + 1, out));
        }
        Ok(ControlFlow::Continue(()))
    }
}

impl CompiledPath {
    /// Returns the first match in traversal order.
    pub fn get<'a>(&self, root: &'a Value) -> Result<&'a Value> {
        Evaluator::default().get(self, root)
    }

    /// Returns every match in depth-first pre-order.
    pub fn get_all<'a>(&self, root: &'a Value) -> Result<Vec<&'a Value>> {
        Evaluator::default().get_all(self, root)
    }

    /// Returns every match, or nothing if the evaluation fails.
    pub fn query<'a>(&self, root: &'a Value) -> Vec<&'a Value> {
        self.get_all(root).unwrap_or_default()
    }

    /// Checks whether the path selects any node.
    pub fn exists(&self, root: &Value) -> bool {
        Evaluator::default().exists(self, root)
    }

    pub fn count(&self, root: &Value) -> usize {
        Evaluator::default().count(self, root)
    }

    pub fn filter<'a>(
        &self,
        root: &'a Value,
        predicate: Option<NodePredicate<'_>>,
    ) -> Result<Vec<&'a Value>> {
        Evaluator::default().filter(self, root, predicate)
    }

    pub fn set(&self, root: &mut Value, value: impl Into<Value>) -> Result<()> {
        Evaluator::default().set(self, root, value.into())
    }

    pub fn delete(&self, root: &mut Value) -> Result<()> {
        Evaluator::default().delete(self, root)
    }
}

/// Resolves a possibly negative index. Non-negative indices may be out of range.
fn resolve_index(len: usize, index: i64) -> Option<usize> {
    if index >= 0 {
        usize::try_from(index).ok()
    } else {
        let i = len as i64 + index;
        usize::try_from(i).ok()
    }
}

/// Replaces a null `node` with the container `segment` addresses.
fn vivify(node: &mut Value, segment: &Segment) -> bool {
    let container = match segment {
        Segment::Property(_) => Value::Object(Object::new()),
        Segment::Index(_) => Value::Array(Array::new()),
        _ => return false,
    };
    trace!(%segment, kind = %container.kind(), "creating missing container");
    *node = container;
    true
}

fn assigned_any(result: &Result<usize>) -> bool {
    matches!(result, Ok(n) if *n > 0)
}

/// Returns true if a missing node may be created ahead of `rest`.
fn can_create(rest: &[Segment]) -> bool {
    matches!(
        rest.first(),
        None | Some(Segment::Property(_)) | Some(Segment::Index(_))
    )
}

fn remove_children(node: &mut Value, mut remove: impl FnMut(&Value) -> bool) -> usize {
    match node {
        Value::Array(array) => {
            let before = array.len();
            array.retain(|child| !remove(child));
            before - array.len()
        }
        Value::Object(object) => {
            let before = object.len();
            object.retain(|child| !remove(child));
            before - object.len()
        }
        _ => 0,
    }
}

fn mismatch(segment: &Segment, found: Kind) -> Error {
    let expected = match segment {
        Segment::Property(_) => "object",
        Segment::Index(_) => "array",
        _ => "array or object",
    };
    Error::TypeMismatch {
        segment: segment.to_string().into(),
        expected,
        found,
    }
}
