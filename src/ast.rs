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

//! The AST of compiled paths.

use std::fmt::{Display, Formatter};

/// A compiled path: the source text and the segments parsed from it.
///
/// A `CompiledPath` is immutable. Obtain shared instances through a
/// [`PathCache`](crate::PathCache).
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPath {
    pub(crate) path: Box<str>,
    pub(crate) segments: Vec<Segment>,
}

impl CompiledPath {
    /// Returns the path text this was compiled from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the segments in evaluation order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if the path addresses the root itself (`$` or the empty path).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

/// A single step of a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// `.name` or `['name']` selects the member of an object.
    Property(String),
    /// `[n]` selects the n-th element of an array. Negative indices count from the end.
    Index(i64),
    /// `.*` or `[*]` selects every child of an array or object.
    Wildcard,
    /// `..` selects the current node and all of its descendants, in pre-order.
    ///
    /// It is always followed by another segment: `..name` compiles to
    /// `RecursiveDescent, Property("name")`.
    RecursiveDescent,
    /// `[?(<predicate>)]` selects the children that satisfy the predicate,
    /// like `$.store.book[?(@.price < 10)]`.
    Filter(Box<Predicate>),
}

/// A boolean test over a candidate node `@`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `@.field <op> <literal>` compares a field of the candidate with a literal.
    Compare(FieldPath, CompareOp, Literal),
    /// `@.field` tests that a field of the candidate exists.
    Exists(FieldPath),
    /// `&&` represents logical AND.
    And(Box<Predicate>, Box<Predicate>),
    /// `||` represents logical OR.
    Or(Box<Predicate>, Box<Predicate>),
}

/// A chain of member names relative to the candidate node.
///
/// An empty chain is the candidate itself (`@`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(pub(crate) Vec<String>);

impl FieldPath {
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==` represents left is equal to right.
    Eq,
    /// `!=` represents left is not equal to right.
    Ne,
    /// `<` represents left is less than right.
    Lt,
    /// `<=` represents left is less or equal to right.
    Le,
    /// `>` represents left is greater than right.
    Gt,
    /// `>=` represents left is greater than or equal to right.
    Ge,
}

/// A literal on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Number value.
    Number(f64),
    /// UTF-8 string.
    String(String),
}

impl Display for CompiledPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "$")?;
        let mut after_descent = false;
        for segment in &self.segments {
            match segment {
                // `..` already supplies the separator
                Segment::Property(name) if after_descent && is_identifier(name) => {
                    write!(f, "{name}")?
                }
                _ => write!(f, "{segment}")?,
            }
            after_descent = matches!(segment, Segment::RecursiveDescent);
        }
        Ok(())
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Property(name) if is_identifier(name) => write!(f, ".{name}"),
            Self::Property(name) => {
                write!(f, "[")?;
                write_quoted(f, name)?;
                write!(f, "]")
            }
            Self::Index(i) => write!(f, "[{i}]"),
            Self::Wildcard => write!(f, "[*]"),
            Self::RecursiveDescent => write!(f, ".."),
            Self::Filter(pred) => write!(f, "[?({pred})]"),
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compare(field, op, literal) => write!(f, "{field} {op} {literal}"),
            Self::Exists(field) => write!(f, "{field}"),
            Self::And(left, right) => write!(f, "({left} && {right})"),
            Self::Or(left, right) => write!(f, "({left} || {right})"),
        }
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@")?;
        for name in &self.0 {
            write!(f, ".{name}")?;
        }
        Ok(())
    }
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq => write!(f, "=="),
            Self::Ne => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::String(v) => write_quoted(f, v),
        }
    }
}

/// Returns true if `name` can be written after a dot without quoting.
pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_identifier_char)
}

fn write_quoted(f: &mut Formatter<'_>, s: &str) -> std::fmt::Result {
    write!(f, "'")?;
    for c in s.chars() {
        match c {
            '\'' => write!(f, "\\'")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\r' => write!(f, "\\r")?,
            '\t' => write!(f, "\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "'")
}
