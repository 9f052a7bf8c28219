// Copyright (c) Contributors to the layercfg project.
// SPDX-License-Identifier: Apache-2.0

//! Sources backed by YAML, JSON, TOML and INI files.

use std::path::{Path, PathBuf};

use crate::{ConfigurationSource, Error, Mapping, Result, Value};

#[cfg(test)]
#[path = "./file_test.rs"]
mod file_test;

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
    Toml,
    Ini,
}

impl FileFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            Some("toml") => Some(Self::Toml),
            Some("ini") => Some(Self::Ini),
            _ => None,
        }
    }

    fn parse(self, content: &str) -> std::result::Result<Value, String> {
        match self {
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str::<toml::Table>(content)
                .map(|table| toml_to_value(toml::Value::Table(table)))
                .map_err(|e| e.to_string()),
            Self::Ini => ini::Ini::load_from_str(content)
                .map(|parsed| ini_to_value(&parsed))
                .map_err(|e| e.to_string()),
        }
    }
}

/// Datetimes become strings so they stay scalars in the merged tree.
fn toml_to_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(d) => Value::String(d.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_value(value)))
                .collect(),
        ),
    }
}

/// Each section becomes a mapping of string values with lower-cased keys.
///
/// Keys of the `DEFAULT` section are copied into every other section, where
/// the section's own keys win. Keys outside any section stay at the top level.
fn ini_to_value(parsed: &ini::Ini) -> Value {
    let defaults: Mapping = parsed
        .section(Some("DEFAULT"))
        .map(ini_properties)
        .unwrap_or_default();

    let mut values = Mapping::new();
    for (section, properties) in parsed.iter() {
        match section {
            None => values.extend(ini_properties(properties)),
            Some("DEFAULT") => {}
            Some(name) => {
                let mut section_values = defaults.clone();
                section_values.extend(ini_properties(properties));
                values.insert(name.to_string(), Value::Object(section_values));
            }
        }
    }
    Value::Object(values)
}

fn ini_properties(properties: &ini::Properties) -> Mapping {
    properties
        .iter()
        .map(|(key, value)| (key.to_lowercase(), Value::String(value.to_string())))
        .collect()
}

/// Resolve `~/` against `home`; other paths are used as given.
fn expand_home(path: &Path, home: Option<PathBuf>) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rel) => home
            .map(|home| home.join(rel))
            .ok_or_else(|| Error::HomeDirUnavailable(path.to_owned())),
        Err(_) => Ok(path.to_owned()),
    }
}

/// A configuration file read fresh on every build.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: FileFormat,
    optional: bool,
}

impl FileSource {
    /// Create a source whose format is chosen by the file extension.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format =
            FileFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat(path.to_owned()))?;
        Ok(Self::with_format(path, format))
    }

    pub fn with_format<P: AsRef<Path>>(path: P, format: FileFormat) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            format,
            optional: false,
        }
    }

    pub fn yaml<P: AsRef<Path>>(path: P) -> Self {
        Self::with_format(path, FileFormat::Yaml)
    }

    pub fn json<P: AsRef<Path>>(path: P) -> Self {
        Self::with_format(path, FileFormat::Json)
    }

    pub fn toml<P: AsRef<Path>>(path: P) -> Self {
        Self::with_format(path, FileFormat::Toml)
    }

    pub fn ini<P: AsRef<Path>>(path: P) -> Self {
        Self::with_format(path, FileFormat::Ini)
    }

    /// When optional, a missing file yields an empty mapping instead of an error.
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    fn resolved_path(&self) -> Result<PathBuf> {
        expand_home(&self.path, dirs::home_dir())
    }
}

impl ConfigurationSource for FileSource {
    fn get_values(&self) -> Result<Value> {
        let path = self.resolved_path()?;
        if !path.is_file() {
            if self.optional {
                tracing::debug!(path = %path.display(), "optional configuration file not found");
                return Ok(Value::Object(Mapping::new()));
            }
            return Err(Error::MissingSource(path));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| Error::ReadFailed {
            path: path.clone(),
            error: e,
        })?;

        self.format
            .parse(&content)
            .map_err(|message| Error::InvalidSource {
                name: path.display().to_string(),
                message,
            })
    }

    fn name(&self) -> String {
        match self.format {
            FileFormat::Yaml => "YAMLFile",
            FileFormat::Json => "JSONFile",
            FileFormat::Toml => "TOMLFile",
            FileFormat::Ini => "INIFile",
        }
        .to_string()
    }
}
