//! Batch operations over many paths.
//!
//! A batch never stops at the first failure: every entry gets its own result,
//! reported in input order.

use crate::error::Result;
use crate::query;
use crate::value::Value;

/// The outcome of one lookup in [`get_batch`].
#[derive(Debug, PartialEq)]
pub struct GetResult<'a> {
    pub path: String,
    pub result: Result<&'a Value>,
}

/// The outcome of one assignment in [`set_batch`].
#[derive(Debug, PartialEq)]
pub struct SetResult {
    pub path: String,
    pub result: Result<()>,
}

/// Looks up each path in `paths`.
pub fn get_batch<'a, P: AsRef<str>>(
    root: impl Into<Option<&'a Value>>,
    paths: impl IntoIterator<Item = P>,
) -> Vec<GetResult<'a>> {
    let root = root.into();
    paths
        .into_iter()
        .map(|path| {
            let path = path.as_ref();
            GetResult {
                path: path.to_owned(),
                result: query::get(root, path),
            }
        })
        .collect()
}

/// Applies each `(path, value)` assignment in order.
///
/// Later assignments observe the effect of earlier ones.
pub fn set_batch<P: AsRef<str>>(
    mut root: Option<&mut Value>,
    ops: impl IntoIterator<Item = (P, Value)>,
) -> Vec<SetResult> {
    ops.into_iter()
        .map(|(path, value)| {
            let path = path.as_ref();
            SetResult {
                path: path.to_owned(),
                result: query::set(root.as_deref_mut(), path, value),
            }
        })
        .collect()
}
