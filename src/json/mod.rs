//! Conversion between [`Value`] trees and JSON text.
//!
//! - [`parse_text`]: parses JSON text with a nesting limit.
//! - [`serialize`]: writes JSON text according to [`SerializeOptions`].
//!
//! [`Value`] also implements [`serde::Serialize`] and [`serde::Deserialize`],
//! and converts to and from [`serde_json::Value`].

use std::str::FromStr;

use ::serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use serde::de::DeserializeSeed;
use serde::Serialize;

use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::{Error, Result};
use crate::value::Value;

mod de;
mod ser;
mod serde_json;

/// Parses JSON text into a [`Value`].
///
/// Fails if the text is malformed, or if containers nest deeper than
/// `max_depth`. When an object repeats a key, the last value wins and the
/// key keeps its first position.
///
/// ```rust
/// use jsonpath_dom::json::parse_text;
///
/// let value = parse_text(br#"{"a": [1, 2]}"#, 8).unwrap();
/// assert_eq!(value.depth(), 2);
/// assert!(parse_text(b"[[[1]]]", 2).is_err());
/// ```
pub fn parse_text(text: &[u8], max_depth: usize) -> Result<Value> {
    let mut deserializer = ::serde_json::Deserializer::from_slice(text);
    let value = de::ValueSeed::new(max_depth)
        .deserialize(&mut deserializer)
        .map_err(parse_error)?;
    deserializer.end().map_err(parse_error)?;
    Ok(value)
}

fn parse_error(e: ::serde_json::Error) -> Error {
    Error::Parse(e.to_string().into())
}

impl FromStr for Value {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_text(s.as_bytes(), DEFAULT_MAX_DEPTH)
    }
}

/// Options for [`serialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Write everything on one line. When false, `indent` is used.
    pub compact: bool,
    pub indent: String,
    /// Write object members in key order instead of insertion order.
    pub sort_keys: bool,
    /// Maximum container nesting.
    pub max_depth: usize,
    /// Escape `<`, `>`, `&`, U+2028 and U+2029 in strings.
    pub html_escape: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            compact: true,
            indent: "  ".into(),
            sort_keys: false,
            max_depth: DEFAULT_MAX_DEPTH,
            html_escape: false,
        }
    }
}

impl SerializeOptions {
    /// Returns multi-line options using `indent`.
    pub fn pretty(indent: impl Into<String>) -> Self {
        Self {
            compact: false,
            indent: indent.into(),
            ..Default::default()
        }
    }
}

/// Writes `value` as JSON text.
///
/// ```rust
/// use jsonpath_dom::json::{serialize, SerializeOptions};
/// use jsonpath_dom::Value;
///
/// let value: Value = r#"{"b": 1.0, "a": "<x>"}"#.parse().unwrap();
/// let options = SerializeOptions {
///     sort_keys: true,
///     html_escape: true,
///     ..Default::default()
/// };
/// assert_eq!(
///     serialize(&value, &options).unwrap(),
///     r#"{"a":"\u003cx\u003e","b":1}"#
/// );
/// ```
pub fn serialize(value: &Value, options: &SerializeOptions) -> Result<String> {
    if value.depth() > options.max_depth {
        return Err(Error::MaxDepth(options.max_depth));
    }
    let text = if options.compact {
        write(value, options.sort_keys, CompactFormatter)?
    } else {
        write(
            value,
            options.sort_keys,
            PrettyFormatter::with_indent(options.indent.as_bytes()),
        )?
    };
    Ok(if options.html_escape {
        ser::escape_html(&text)
    } else {
        text
    })
}

fn write<F: Formatter>(value: &Value, sort_keys: bool, formatter: F) -> Result<String> {
    let mut buf = Vec::with_capacity(128);
    let mut serializer = ::serde_json::Serializer::with_formatter(&mut buf, formatter);
    let result = if sort_keys {
        ser::Sorted(value).serialize(&mut serializer)
    } else {
        value.serialize(&mut serializer)
    };
    result.map_err(|e| Error::Serialize(e.to_string().into()))?;
    String::from_utf8(buf).map_err(|e| Error::Serialize(e.to_string().into()))
}
