// Copyright (c) Contributors to the layercfg project.
// SPDX-License-Identifier: Apache-2.0

//! Path overrides: writing a value at a location addressed by a delimited key.
//!
//! A key such as `logging:level` or `logging__level` addresses a nested slot.
//! Missing mappings along the way are created; sequences are only ever indexed,
//! never grown.

use crate::error::OverrideError;
use crate::{Mapping, Value};

#[cfg(test)]
#[path = "./apply_test.rs"]
mod apply_test;

/// Delimiters that split a key into segments, in priority order.
pub const PATH_DELIMITERS: [&str; 2] = [":", "__"];

/// A key split into the segments leading to its target and the terminal one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverridePath<'a> {
    /// The stripped key the path was parsed from.
    pub key: &'a str,
    /// Segments walked before reaching the target container.
    pub parents: Vec<&'a str>,
    /// The segment assigned within the target container.
    pub terminal: &'a str,
}

impl<'a> OverridePath<'a> {
    /// Parse a key, returning `None` when it addresses a single top-level slot.
    ///
    /// Leading and trailing `_` and `:` characters are ignored.
    pub fn parse(key: &'a str) -> Option<Self> {
        let key = strip_key(key);
        let delimiter = PATH_DELIMITERS.iter().find(|d| key.contains(**d))?;
        let mut segments: Vec<&str> = key.split(*delimiter).collect();
        let terminal = segments.pop()?;
        Some(Self {
            key,
            parents: segments,
            terminal,
        })
    }
}

/// Remove the special characters from both ends of a key.
pub fn strip_key(key: &str) -> &str {
    key.trim_matches(|c| c == '_' || c == ':')
}

/// The container the walk is currently positioned in.
enum Cursor<'v> {
    Map(&'v mut Mapping),
    Seq(&'v mut Vec<Value>),
}

/// Assign `value` at the location addressed by `key` inside `root`.
///
/// Plain keys replace the top-level slot outright; delimited keys drill into
/// the existing tree, creating intermediate mappings as needed.
pub fn apply_key_value(root: &mut Mapping, key: &str, value: Value) -> Result<(), OverrideError> {
    let Some(path) = OverridePath::parse(key) else {
        root.insert(strip_key(key).to_string(), value);
        return Ok(());
    };

    let mut cursor = Cursor::Map(root);
    for segment in &path.parents {
        cursor = descend(cursor, segment, path.key)?;
    }

    match cursor {
        Cursor::Map(map) => {
            map.insert(path.terminal.to_string(), value);
        }
        Cursor::Seq(seq) => {
            let slot = index_into(seq, path.terminal, path.key)?;
            *slot = value;
        }
    }
    Ok(())
}

/// Step from the current container into the child named by `segment`.
fn descend<'v>(cursor: Cursor<'v>, segment: &str, key: &str) -> Result<Cursor<'v>, OverrideError> {
    let child = match cursor {
        Cursor::Map(map) => map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Mapping::new())),
        Cursor::Seq(seq) => index_into(seq, segment, key)?,
    };
    match child {
        Value::Object(map) => Ok(Cursor::Map(map)),
        Value::Array(seq) => Ok(Cursor::Seq(seq)),
        _ => Err(OverrideError::ScalarConflict {
            key: key.to_string(),
            segment: segment.to_string(),
        }),
    }
}

/// Resolve an index token against an existing sequence element.
fn index_into<'v>(
    seq: &'v mut [Value],
    segment: &str,
    key: &str,
) -> Result<&'v mut Value, OverrideError> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OverrideError::NonNumericIndex {
            key: key.to_string(),
            segment: segment.to_string(),
        });
    }
    let len = seq.len();
    segment
        .parse::<usize>()
        .ok()
        .and_then(|index| seq.get_mut(index))
        .ok_or_else(|| OverrideError::IndexOutOfRange {
            key: key.to_string(),
            segment: segment.to_string(),
            len,
        })
}
