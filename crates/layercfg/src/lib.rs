// Copyright (c) Contributors to the layercfg project.
// SPDX-License-Identifier: Apache-2.0

//! layercfg - Layered Configuration Engine
//!
//! This crate collects structured values from an ordered list of sources,
//! merges them into a single tree where later sources override earlier ones,
//! and exposes the result through a read-only, navigable [`Configuration`].
//!
//! # Overview
//!
//! A top-level key replaces the whole branch it names. A key containing `:`
//! or `__` is a path and only overrides the addressed slot, which is how
//! environment variables such as `APP_LOGGING__LEVEL` reach into structure
//! loaded from files.
//!
//! # Example
//!
//! ```no_run
//! use layercfg::{ConfigurationBuilder, EnvVars, FileSource};
//!
//! # fn main() -> layercfg::Result<()> {
//! let mut builder = ConfigurationBuilder::new();
//! builder
//!     .add_source(FileSource::yaml("settings.yaml"))
//!     .add_source(FileSource::yaml("settings.local.yaml").optional(true))
//!     .add_source(EnvVars::with_prefix("APP_"))
//!     .add_value("logging:level", "DEBUG");
//!
//! let config = builder.build()?;
//! let level = config.attr("logging")?.attr("level")?;
//! assert_eq!(level, "DEBUG");
//! # Ok(())
//! # }
//! ```

pub mod apply;
pub mod builder;
pub mod env;
pub mod error;
pub mod file;
pub mod merge;
pub mod source;
pub mod view;

pub use apply::{apply_key_value, OverridePath};
pub use builder::ConfigurationBuilder;
pub use env::{EnvVars, EnvironmentVariables};
pub use error::{Error, OverrideError, Result};
pub use file::{FileFormat, FileSource};
pub use merge::merge_values;
pub use source::{ConfigurationSource, MapSource};
pub use view::{Configuration, Setting};

/// A configuration value: scalar, sequence or mapping.
pub use serde_json::Value;

/// A keyed mapping of configuration values, in insertion order.
pub type Mapping = serde_json::Map<String, Value>;
