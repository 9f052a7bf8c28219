// Copyright (c) Contributors to the layercfg project.
// SPDX-License-Identifier: Apache-2.0

//! Read-only navigation over a merged configuration tree.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{Error, Mapping, Result, Value};

#[cfg(test)]
#[path = "./view_test.rs"]
mod view_test;

/// An immutable view over a configuration mapping.
///
/// Nested mappings and sequences are wrapped only when they are looked up.
/// Two lookup protocols exist over the same data: [`Configuration::attr`]
/// fails with [`Error::MissingConfiguration`] and [`Configuration::item`]
/// fails with [`Error::KeyNotFound`].
#[derive(Clone, Default, PartialEq)]
pub struct Configuration {
    data: Arc<Mapping>,
}

/// A value found in a [`Configuration`].
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    /// A string, number, boolean or null.
    Scalar(Value),
    /// A nested mapping.
    Section(Configuration),
    /// A sequence; mapping elements are wrapped, scalars are kept as they are.
    Sequence(Vec<Setting>),
}

impl Configuration {
    pub fn new(values: Mapping) -> Self {
        Self {
            data: Arc::new(values),
        }
    }

    /// Resolve a key, wrapping the value if it is a mapping or sequence.
    ///
    /// Returns `None` when the key is absent.
    pub fn lookup(&self, key: &str) -> Option<Setting> {
        self.data.get(key).map(Setting::wrap)
    }

    /// Attribute-style access.
    pub fn attr(&self, name: &str) -> Result<Setting> {
        self.lookup(name)
            .ok_or_else(|| Error::MissingConfiguration(name.to_string()))
    }

    /// Item-style access.
    pub fn item(&self, key: &str) -> Result<Setting> {
        self.lookup(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A copy of the underlying values.
    pub fn values(&self) -> Mapping {
        self.data.as_ref().clone()
    }

    /// Deserialize a copy of the underlying values into `T`.
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T> {
        bind_value(Value::Object(self.values()))
    }
}

impl From<Mapping> for Configuration {
    fn from(values: Mapping) -> Self {
        Self::new(values)
    }
}

// Values are never printed so secrets do not end up in logs.
// Scalars are hidden too; every key renders as "...".
impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<Configuration {")?;
        for (i, key) in self.data.keys().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key:?}: \"...\"")?;
        }
        f.write_str("}>")
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Setting {
    fn wrap(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Section(Configuration::new(map.clone())),
            Value::Array(items) => Self::Sequence(items.iter().map(Self::wrap).collect()),
            scalar => Self::Scalar(scalar.clone()),
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    pub fn as_section(&self) -> Option<&Configuration> {
        match self {
            Self::Section(section) => Some(section),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Setting]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Element `index` of a sequence.
    pub fn get(&self, index: usize) -> Option<&Setting> {
        self.as_sequence().and_then(|items| items.get(index))
    }

    /// Attribute-style access into a section; any other setting has no attributes.
    pub fn attr(&self, name: &str) -> Result<Setting> {
        match self {
            Self::Section(section) => section.attr(name),
            _ => Err(Error::MissingConfiguration(name.to_string())),
        }
    }

    /// Item-style access into a section.
    pub fn item(&self, key: &str) -> Result<Setting> {
        match self {
            Self::Section(section) => section.item(key),
            _ => Err(Error::KeyNotFound(key.to_string())),
        }
    }

    /// Unwrap back into a plain value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::Section(section) => Value::Object(section.values()),
            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_value).collect()),
        }
    }

    pub fn bind<T: DeserializeOwned>(&self) -> Result<T> {
        bind_value(self.to_value())
    }
}

impl PartialEq<str> for Setting {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Setting {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<Value> for Setting {
    fn eq(&self, other: &Value) -> bool {
        self.to_value() == *other
    }
}

fn bind_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::Bind {
        message: e.to_string(),
    })
}
