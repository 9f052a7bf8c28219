// Copyright (c) Contributors to the layercfg project.
// SPDX-License-Identifier: Apache-2.0

//! Building a configuration from an ordered list of sources.

use std::fmt;

use crate::merge::merge_values;
use crate::{Configuration, ConfigurationSource, MapSource, Mapping, Result, Value};

#[cfg(test)]
#[path = "./builder_test.rs"]
mod builder_test;

/// Collects sources and merges them into a [`Configuration`].
///
/// Sources are applied in the order they were added and later sources
/// override earlier ones. Nothing is cached: every call to
/// [`ConfigurationBuilder::build`] reads every source again.
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    sources: Vec<Box<dyn ConfigurationSource>>,
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sources<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn ConfigurationSource>>,
    {
        Self {
            sources: sources.into_iter().collect(),
        }
    }

    pub fn sources(&self) -> &[Box<dyn ConfigurationSource>] {
        &self.sources
    }

    pub fn add_source<S: ConfigurationSource + 'static>(&mut self, source: S) -> &mut Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Add a fixed mapping of values.
    pub fn add_map(&mut self, values: Mapping) -> &mut Self {
        self.add_source(MapSource::new(values))
    }

    /// Add a single value; `key` may be path-delimited, e.g. `a:d:e`.
    pub fn add_value<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> &mut Self {
        self.add_source(MapSource::single(key, value))
    }

    /// Read and merge every source, returning the plain merged mapping.
    pub fn build_values(&self) -> Result<Mapping> {
        tracing::debug!(sources = self.sources.len(), "building configuration");
        let mut settings = Mapping::new();
        for source in &self.sources {
            let name = source.name();
            let values = source.get_values()?;
            merge_values(&mut settings, values, &name)?;
            tracing::debug!(source = %name, "merged configuration source");
        }
        Ok(settings)
    }

    /// Read and merge every source into a new [`Configuration`].
    pub fn build(&self) -> Result<Configuration> {
        self.build_values().map(Configuration::new)
    }
}

impl fmt::Display for ConfigurationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<ConfigurationBuilder [")?;
        for (i, source) in self.sources.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "<{}>", source.name())?;
        }
        f.write_str("]>")
    }
}
