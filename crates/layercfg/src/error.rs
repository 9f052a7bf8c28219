// Copyright (c) Contributors to the layercfg project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for layercfg operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[cfg(test)]
#[path = "./error_test.rs"]
mod error_test;

/// Convenience Result type with layercfg Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or reading a configuration.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// A path-delimited key could not be applied to the merged tree
    #[error(transparent)]
    #[diagnostic(transparent)]
    Override(#[from] OverrideError),

    /// A required source's backing file does not exist
    #[error("Missing configuration file: {0:?}")]
    #[diagnostic(
        code(layercfg::missing_source),
        help("Create the file or mark the source as optional")
    )]
    MissingSource(PathBuf),

    /// Attribute-style lookup of an absent key
    #[error("Configuration settings have no attribute '{0}'")]
    #[diagnostic(code(layercfg::missing_configuration))]
    MissingConfiguration(String),

    /// Item-style lookup of an absent key
    #[error("Configuration settings have no key '{0}'")]
    #[diagnostic(code(layercfg::key_not_found))]
    KeyNotFound(String),

    /// A source produced something other than a mapping at its root
    #[error("Source {source_name} did not produce a mapping")]
    #[diagnostic(
        code(layercfg::not_a_mapping),
        help("The top level of every configuration source must be a key/value mapping")
    )]
    NotAMapping { source_name: String },

    /// A source's backing resource could not be parsed
    #[error("Invalid configuration in {name}: {message}")]
    #[diagnostic(code(layercfg::invalid_source))]
    InvalidSource { name: String, message: String },

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(layercfg::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// File extension does not map to a known format
    #[error("Unsupported configuration file format: {0:?}")]
    #[diagnostic(
        code(layercfg::unsupported_format),
        help("Use a .yaml, .yml, .json, .toml or .ini file, or pick the format explicitly")
    )]
    UnsupportedFormat(PathBuf),

    /// A `~/` path was given but no home directory is known
    #[error("Cannot resolve {0:?} without a home directory")]
    #[diagnostic(
        code(layercfg::home_unavailable),
        help("Set HOME or use an absolute path")
    )]
    HomeDirUnavailable(PathBuf),

    /// Raw values could not be deserialized into the requested type
    #[error("Failed to bind configuration: {message}")]
    #[diagnostic(code(layercfg::bind_failed))]
    Bind { message: String },
}

impl Error {
    /// True for both lookup miss kinds, whichever protocol raised them.
    pub fn is_missing_key(&self) -> bool {
        self.missing_key().is_some()
    }

    /// The name that was looked up and not found, if this is a lookup miss.
    pub fn missing_key(&self) -> Option<&str> {
        match self {
            Error::MissingConfiguration(name) | Error::KeyNotFound(name) => Some(name),
            _ => None,
        }
    }
}

/// Reasons a path override cannot be applied.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum OverrideError {
    /// A segment addressing a sequence is not a base-10 index
    #[error("{segment} was supposed to be a numeric index in {key}")]
    #[diagnostic(
        code(layercfg::path::non_numeric_index),
        help("The value at this position is a sequence; address its elements by index")
    )]
    NonNumericIndex { key: String, segment: String },

    /// A sequence index does not reference an existing element
    #[error("Invalid override for sequence {key}; index {segment} out of range (length {len})")]
    #[diagnostic(
        code(layercfg::path::index_out_of_range),
        help("Overrides never grow sequences; only existing elements can be replaced")
    )]
    IndexOutOfRange {
        key: String,
        segment: String,
        len: usize,
    },

    /// A segment tries to descend through a scalar value
    #[error(
        "The key `{key}` cannot be used because it overrides another variable with shorter key! ({segment})"
    )]
    #[diagnostic(code(layercfg::path::scalar_conflict))]
    ScalarConflict { key: String, segment: String },
}
