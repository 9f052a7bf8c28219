// Copyright (c) Contributors to the layercfg project.
// SPDX-License-Identifier: Apache-2.0

//! Folding one source's values into the running configuration tree.

use crate::apply::apply_key_value;
use crate::{Error, Mapping, Result, Value};

#[cfg(test)]
#[path = "./merge_test.rs"]
mod merge_test;

/// Merge the values produced by `source_name` into `destination`.
///
/// Every top-level key goes through [`apply_key_value`], so a plain key
/// replaces the whole branch while a delimited key drills into it. A `null`
/// result counts as an empty mapping.
pub fn merge_values(destination: &mut Mapping, values: Value, source_name: &str) -> Result<()> {
    let values = match values {
        Value::Object(map) => map,
        Value::Null => return Ok(()),
        _ => {
            return Err(Error::NotAMapping {
                source_name: source_name.to_string(),
            });
        }
    };

    for (key, value) in values {
        tracing::trace!(source = source_name, key = %key, "applying configuration key");
        apply_key_value(destination, &key, value)?;
    }
    Ok(())
}
