// Copyright (c) Contributors to the layercfg project.
// SPDX-License-Identifier: Apache-2.0

//! The source contract and the in-memory map source.

use std::fmt;

use crate::{Mapping, Result, Value};

#[cfg(test)]
#[path = "./source_test.rs"]
mod source_test;

/// Something that produces configuration values on demand.
///
/// Sources are read again on every build, so implementations should not
/// cache what they read.
pub trait ConfigurationSource: fmt::Debug + Send + Sync {
    /// Returns the values read from this source.
    ///
    /// The result is expected to be a mapping; `null` is accepted as empty.
    fn get_values(&self) -> Result<Value>;

    /// Human-readable name, used in diagnostics and error messages.
    fn name(&self) -> String {
        short_type_name::<Self>().to_string()
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// A source that yields a fixed, caller-supplied mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapSource {
    values: Mapping,
}

impl MapSource {
    pub fn new(values: Mapping) -> Self {
        Self { values }
    }

    /// A source holding a single key, which may be path-delimited.
    pub fn single<K: Into<String>, V: Into<Value>>(key: K, value: V) -> Self {
        let mut values = Mapping::new();
        values.insert(key.into(), value.into());
        Self { values }
    }

    pub fn values(&self) -> &Mapping {
        &self.values
    }
}

impl From<Mapping> for MapSource {
    fn from(values: Mapping) -> Self {
        Self::new(values)
    }
}

impl ConfigurationSource for MapSource {
    fn get_values(&self) -> Result<Value> {
        Ok(Value::Object(self.values.clone()))
    }
}
