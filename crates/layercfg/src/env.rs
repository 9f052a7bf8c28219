// Copyright (c) Contributors to the layercfg project.
// SPDX-License-Identifier: Apache-2.0

//! A source reading process environment variables, optionally seeded from a
//! dotenv file.
//!
//! Keys are lower-cased, so `APP_LOGGING__LEVEL=DEBUG` read with the prefix
//! `APP_` overrides `logging.level` of earlier sources.

use std::path::{Path, PathBuf};

use crate::{ConfigurationSource, Error, Mapping, Result, Value};

#[cfg(test)]
#[path = "./env_test.rs"]
mod env_test;

/// Environment variables, filtered by an optional prefix.
#[derive(Debug, Clone)]
pub struct EnvironmentVariables {
    prefix: Option<String>,
    strip_prefix: bool,
    file: Option<PathBuf>,
}

/// Short alias matching the common spelling.
pub type EnvVars = EnvironmentVariables;

impl Default for EnvironmentVariables {
    fn default() -> Self {
        Self {
            prefix: None,
            strip_prefix: true,
            file: None,
        }
    }
}

impl EnvironmentVariables {
    /// Read every variable of the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only read variables starting with `prefix` (case-insensitive).
    pub fn with_prefix<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Keep the prefix in the produced keys instead of removing it.
    pub fn strip_prefix(mut self, strip: bool) -> Self {
        self.strip_prefix = strip;
        self
    }

    /// Also read variables from a dotenv file; the process environment wins.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().to_owned());
        self
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn read_file(&self, path: &Path) -> Result<Vec<(String, String)>> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "dotenv file not found, skipping");
            return Ok(Vec::new());
        }
        let invalid = |e: dotenvy::Error| Error::InvalidSource {
            name: path.display().to_string(),
            message: e.to_string(),
        };
        dotenvy::from_path_iter(path)
            .map_err(invalid)?
            .map(|item| item.map_err(invalid))
            .collect()
    }

    fn filter_key(&self, key: &str) -> Option<String> {
        let key = key.to_lowercase();
        let Some(prefix) = &self.prefix else {
            return Some(key);
        };
        let prefix = prefix.to_lowercase();
        if !key.starts_with(&prefix) {
            return None;
        }
        if self.strip_prefix {
            Some(key[prefix.len()..].to_string())
        } else {
            Some(key)
        }
    }
}

impl ConfigurationSource for EnvironmentVariables {
    fn get_values(&self) -> Result<Value> {
        let mut variables = match &self.file {
            Some(path) => self.read_file(path)?,
            None => Vec::new(),
        };
        variables.extend(std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }));

        let mut values = Mapping::new();
        for (key, value) in variables {
            if let Some(key) = self.filter_key(&key) {
                values.insert(key, Value::String(value));
            }
        }
        Ok(Value::Object(values))
    }
}
