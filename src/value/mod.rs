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

//! The in-memory document model.
//!
//! A document is a tree of [`Value`]s. Containers own their children, so a
//! tree can only be shared by reference and can never contain itself.

use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};

mod array;
mod object;

pub use array::Array;
pub use object::Object;

/// The kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

/// A JSON value.
///
/// Numbers are stored canonically as `f64`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// JSON `null`.
    #[default]
    Null,
    /// JSON `true` or `false`.
    Bool(bool),
    /// A JSON number.
    Number(f64),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of values.
    Array(Array),
    /// An insertion-ordered map of unique keys to values.
    Object(Object),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Coerces a scalar to a boolean.
    ///
    /// Empty strings and zero are `false`; every other string or number is
    /// `true`. Null and containers cannot be coerced.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => Ok(*n != 0.0),
            Value::String(s) => Ok(!s.is_empty()),
            _ => Err(self.conversion_error("bool")),
        }
    }

    /// Converts a number, or a numeric string, to `f64`.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| self.conversion_error("f64")),
            _ => Err(self.conversion_error("f64")),
        }
    }

    /// Converts a number, or a numeric string, to `i64`.
    ///
    /// Fails if the number has a fractional component or does not fit.
    pub fn as_i64(&self) -> Result<i64> {
        let n = self.as_f64().map_err(|_| self.conversion_error("i64"))?;
        // `i64::MAX as f64` rounds up to 2^63, which is out of range.
        if n.fract() != 0.0 || n < i64::MIN as f64 || n >= i64::MAX as f64 {
            return Err(self.conversion_error("i64"));
        }
        Ok(n as i64)
    }

    /// Converts a number, or a numeric string, to `i32`.
    pub fn as_i32(&self) -> Result<i32> {
        self.as_i64()
            .ok()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| self.conversion_error("i32"))
    }

    /// Returns the string slice of a string value.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.conversion_error("string")),
        }
    }

    /// If the value is an array, returns the associated array. Returns `None` otherwise.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// If the value is an object, returns the associated object. Returns `None` otherwise.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the direct children of a container in their natural order.
    ///
    /// Scalars have no children.
    pub fn children(&self) -> Children<'_> {
        Children(match self {
            Value::Array(array) => ChildrenInner::Array(array.iter()),
            Value::Object(object) => ChildrenInner::Object(object.values()),
            _ => ChildrenInner::Empty,
        })
    }

    /// Returns the direct children of a container, mutably.
    pub fn children_mut(&mut self) -> ChildrenMut<'_> {
        ChildrenMut(match self {
            Value::Array(array) => ChildrenMutInner::Array(array.iter_mut()),
            Value::Object(object) => ChildrenMutInner::Object(object.values_mut()),
            _ => ChildrenMutInner::Empty,
        })
    }

    /// Resets the value to the empty value of its kind.
    ///
    /// Containers are cleared in place and keep their allocation.
    pub fn reset(&mut self) {
        match self {
            Value::Null => {}
            Value::Bool(b) => *b = false,
            Value::Number(n) => *n = 0.0,
            Value::String(s) => s.clear(),
            Value::Array(array) => array.clear(),
            Value::Object(object) => object.clear(),
        }
    }

    /// Returns the container nesting depth. Scalars have depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Value::Array(_) | Value::Object(_) => {
                1 + self.children().map(Value::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    fn conversion_error(&self, to: &'static str) -> Error {
        Error::TypeConversion {
            from: self.kind(),
            to,
        }
    }
}

/// Iterator over the children of a [`Value`], see [`Value::children`].
pub struct Children<'a>(ChildrenInner<'a>);

enum ChildrenInner<'a> {
    Array(std::slice::Iter<'a, Value>),
    Object(indexmap::map::Values<'a, String, Value>),
    Empty,
}

impl<'a> Iterator for Children<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            ChildrenInner::Array(iter) => iter.next(),
            ChildrenInner::Object(iter) => iter.next(),
            ChildrenInner::Empty => None,
        }
    }
}

/// Mutable iterator over the children of a [`Value`], see [`Value::children_mut`].
pub struct ChildrenMut<'a>(ChildrenMutInner<'a>);

enum ChildrenMutInner<'a> {
    Array(std::slice::IterMut<'a, Value>),
    Object(indexmap::map::ValuesMut<'a, String, Value>),
    Empty,
}

impl<'a> Iterator for ChildrenMut<'a> {
    type Item = &'a mut Value;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            ChildrenMutInner::Array(iter) => iter.next(),
            ChildrenMutInner::Object(iter) => iter.next(),
            ChildrenMutInner::Empty => None,
        }
    }
}

/// Renders scalars as text. Containers render as a type marker.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Array(_) => write!(f, "[array]"),
            Value::Object(_) => write!(f, "[object]"),
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Null => write!(f, "null"),
            Kind::Bool => write!(f, "bool"),
            Kind::Number => write!(f, "number"),
            Kind::String => write!(f, "string"),
            Kind::Array => write!(f, "array"),
            Kind::Object => write!(f, "object"),
        }
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
