//! An in-memory JSON document model with a JSONPath query and mutation
//! engine.
//!
//! # Usage
//!
//! ```rust
//! use jsonpath_dom::{query, Value};
//!
//! let mut doc: Value = r#"{"store": {"book": [
//!     {"title": "Sayings", "price": 8.95},
//!     {"title": "Sword", "price": 12.99}
//! ]}}"#
//!     .parse()
//!     .unwrap();
//!
//! let cheap = query::get_all(&doc, "$.store.book[?(@.price < 10)].title").unwrap();
//! assert_eq!(cheap.len(), 1);
//! assert_eq!(cheap[0].to_string(), "Sayings");
//!
//! query::set(&mut doc, "$.store.bicycle.color", "red").unwrap();
//! assert_eq!(query::must_get_str(&doc, "$.store.bicycle.color"), "red");
//! ```
//!
//! Paths are compiled once and shared through a [`PathCache`]. The
//! functions in [`query`] use the process-wide cache; a [`CompiledPath`] can
//! also be evaluated directly or through an [`Evaluator`] with custom limits.

mod ast;
pub mod batch;
mod cache;
mod config;
mod error;
mod eval;
mod filter;
pub mod json;
mod parser;
pub mod pool;
pub mod query;
mod value;

pub use ast::{CompareOp, CompiledPath, FieldPath, Literal, Predicate, Segment};
pub use batch::{get_batch, set_batch, GetResult, SetResult};
pub use cache::{CacheStats, PathCache};
pub use config::{
    Config, DEFAULT_CACHE_SIZE, DEFAULT_MAX_ARRAY_GROWTH, DEFAULT_MAX_DEPTH, DEFAULT_POOL_CAPACITY,
};
pub use error::{Error, Result};
pub use eval::{Evaluator, NodePredicate};
pub use parser::Error as ParseError;
pub use pool::{PoolStats, ValuePool};
pub use value::{Array, Children, ChildrenMut, Kind, Object, Value};
