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

use ::serde_json::{Map, Number};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ser::MAX_SAFE_INTEGER;
use crate::error::{Error, Result};
use crate::value::{Array, Object, Value};

impl From<::serde_json::Value> for Value {
    fn from(value: ::serde_json::Value) -> Self {
        use ::serde_json::Value as J;
        match value {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(b),
            J::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            J::String(s) => Value::String(s),
            J::Array(items) => Value::Array(items.into_iter().map(Value::from).collect::<Array>()),
            J::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Object>(),
            ),
        }
    }
}

impl From<&Value> for ::serde_json::Value {
    fn from(value: &Value) -> Self {
        use ::serde_json::Value as J;
        match value {
            Value::Null => J::Null,
            Value::Bool(b) => J::Bool(*b),
            Value::Number(n) => number(*n).map_or(J::Null, J::Number),
            Value::String(s) => J::String(s.clone()),
            Value::Array(array) => J::Array(array.iter().map(J::from).collect()),
            Value::Object(object) => J::Object(
                object
                    .iter()
                    .map(|(k, v)| (k.clone(), J::from(v)))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

fn number(n: f64) -> Option<Number> {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Some(Number::from(n as i64))
    } else {
        Number::from_f64(n)
    }
}

impl Value {
    /// Decodes the value into a typed record.
    ///
    /// ```rust
    /// use jsonpath_dom::Value;
    ///
    /// #[derive(serde::Deserialize)]
    /// struct Book {
    ///     title: String,
    ///     price: f64,
    /// }
    ///
    /// let value: Value = r#"{"title": "Sword", "price": 8.99}"#.parse().unwrap();
    /// let book: Book = value.deserialize_into().unwrap();
    /// assert_eq!(book.title, "Sword");
    /// assert_eq!(book.price, 8.99);
    /// ```
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
        ::serde_json::from_value(::serde_json::Value::from(self))
            .map_err(|e| Error::Decode(e.to_string().into()))
    }

    /// Encodes a typed record as a value.
    pub fn from_serialize<T: Serialize + ?Sized>(record: &T) -> Result<Self> {
        ::serde_json::to_value(record)
            .map(Value::from)
            .map_err(|e| Error::Serialize(e.to_string().into()))
    }
}
