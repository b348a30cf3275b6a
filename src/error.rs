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

use crate::value::Kind;

pub type Result<T> = std::result::Result<T, Error>;

/// The error type returned by document and path operations.
#[non_exhaustive]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] crate::parser::Error),
    #[error("\"{0}\" not found")]
    NotFound(Box<str>),
    #[error("cannot convert {from} value to {to}")]
    TypeConversion { from: Kind, to: &'static str },
    #[error("segment {segment} cannot be applied to {found} value, expected {expected}")]
    TypeMismatch {
        segment: Box<str>,
        expected: &'static str,
        found: Kind,
    },
    #[error("array index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },
    #[error("cannot replace or delete the root node")]
    RootMutation,
    #[error("document root is nil")]
    NilRoot,
    #[error("predicate cannot be nil")]
    PredicateNil,
    #[error("segment {0} cannot be used to set a value")]
    UnsupportedMutation(Box<str>),
    #[error("maximum depth of {0} exceeded")]
    MaxDepth(usize),
    #[error("invalid JSON text: {0}")]
    Parse(Box<str>),
    #[error("failed to serialize value: {0}")]
    Serialize(Box<str>),
    #[error("failed to decode value: {0}")]
    Decode(Box<str>),
}
