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

//! Evaluation of filter predicates against candidate nodes.
//!
//! Filters are resilient: a field that cannot be resolved, or a value whose
//! kind does not match the literal, makes the comparison false instead of
//! raising an error.

use crate::ast::{CompareOp, FieldPath, Literal, Predicate};
use crate::value::Value;

impl Predicate {
    /// Evaluates the predicate with `candidate` bound to `@`.
    pub fn matches(&self, candidate: &Value) -> bool {
        match self {
            Predicate::Compare(field, op, literal) => field
                .resolve(candidate)
                .is_some_and(|value| compare(*op, value, literal)),
            Predicate::Exists(field) => field.resolve(candidate).is_some(),
            Predicate::And(left, right) => left.matches(candidate) && right.matches(candidate),
            Predicate::Or(left, right) => left.matches(candidate) || right.matches(candidate),
        }
    }
}

impl FieldPath {
    /// Resolves the member chain relative to `candidate`.
    pub fn resolve<'a>(&self, candidate: &'a Value) -> Option<&'a Value> {
        self.0
            .iter()
            .try_fold(candidate, |value, name| value.as_object()?.get(name))
    }
}

/// Compares a resolved field with a literal.
///
/// Numbers compare as `f64` (numeric strings are coerced), strings compare
/// by exact ordering, booleans and null only by identity.
fn compare(op: CompareOp, value: &Value, literal: &Literal) -> bool {
    match literal {
        Literal::Number(n) => value.as_f64().is_ok_and(|v| compare_ord(op, v, *n)),
        Literal::String(s) => value.as_str().is_ok_and(|v| compare_ord(op, v, s.as_str())),
        Literal::Bool(b) => match value {
            Value::Bool(v) => compare_identity(op, v == b),
            _ => false,
        },
        Literal::Null => compare_identity(op, value.is_null()),
    }
}

/// Compare two values that implement `PartialOrd`.
fn compare_ord<T: PartialOrd>(op: CompareOp, left: T, right: T) -> bool {
    use CompareOp::*;
    match op {
        Eq => left == right,
        Ne => left != right,
        Gt => left > right,
        Ge => left >= right,
        Lt => left < right,
        Le => left <= right,
    }
}

/// Identity literals support only `==` and `!=`.
fn compare_identity(op: CompareOp, same: bool) -> bool {
    match op {
        CompareOp::Eq => same,
        CompareOp::Ne => !same,
        _ => false,
    }
}
