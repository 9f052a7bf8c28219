// Copyright (c) Contributors to the layercfg project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicUsize, Ordering};

use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::{EnvironmentVariables, Error, FileSource, OverrideError};

fn map(value: Value) -> Mapping {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected an object, got: {other:?}"),
    }
}

#[derive(Debug)]
struct FooSource;

impl ConfigurationSource for FooSource {
    fn get_values(&self) -> Result<Value> {
        Ok(json!({"foo": "foo"}))
    }
}

/// Produces a different value every time it is read.
#[derive(Debug, Default)]
struct CountingSource {
    reads: AtomicUsize,
}

impl ConfigurationSource for CountingSource {
    fn get_values(&self) -> Result<Value> {
        let count = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(json!({"count": count}))
    }
}

#[rstest]
fn test_build_empty() {
    let config = ConfigurationBuilder::new().build().unwrap();
    assert!(config.is_empty());
}

#[rstest]
fn test_builder() {
    let mut builder = ConfigurationBuilder::new();
    builder.add_source(FooSource);

    let config = builder.build().unwrap();
    assert_eq!(config.attr("foo").unwrap(), "foo");
}

#[rstest]
fn test_later_source_wins() {
    let mut builder = ConfigurationBuilder::new();
    builder
        .add_map(map(json!({"a": {"b": 1}, "c": "first"})))
        .add_map(map(json!({"c": "second"})))
        .add_value("a:b", 2);

    assert_eq!(
        builder.build_values().unwrap(),
        map(json!({"a": {"b": 2}, "c": "second"}))
    );
}

#[rstest]
fn test_add_value_overrides_nested() {
    let mut builder = ConfigurationBuilder::new();
    builder.add_map(map(json!({"a": {"b": 1, "c": 2, "d": {"e": 3, "f": 4}}})));

    let config = builder.build().unwrap();
    let d = config.attr("a").unwrap().attr("d").unwrap();
    assert_eq!(d.attr("e").unwrap(), json!(3));

    builder.add_value("a:d:e", 5);

    let config = builder.build().unwrap();
    let d = config.attr("a").unwrap().attr("d").unwrap();
    assert_eq!(d.attr("e").unwrap(), json!(5));
    assert_eq!(d.attr("f").unwrap(), json!(4));
    assert_eq!(config.attr("a").unwrap().attr("c").unwrap(), json!(2));
}

#[rstest]
#[case(json!({}), "a:b", json!("Hello World"), json!({"a": {"b": "Hello World"}}))]
#[case(json!({"a": ["Source"]}), "a:0", json!("Hello World"), json!({"a": ["Hello World"]}))]
#[case(
    json!({"items": [{"t": "1"}, {"t": "2"}]}),
    "items__0__t",
    json!("9"),
    json!({"items": [{"t": "9"}, {"t": "2"}]})
)]
fn test_add_map_with_path_key(
    #[case] source: Value,
    #[case] key: &str,
    #[case] value: Value,
    #[case] expected: Value,
) {
    let mut builder = ConfigurationBuilder::new();
    builder.add_map(map(source));
    builder.add_map(map(json!({ key: value })));

    let config = builder.build().unwrap();
    assert_eq!(Value::Object(config.values()), expected);
}

#[rstest]
#[case(json!({"a": []}), "a:0")]
#[case(json!({"a": ["Hello World"]}), "a:c")]
#[case(json!({"a": "Hello"}), "a:b:c")]
fn test_invalid_override_aborts_build(#[case] source: Value, #[case] key: &str) {
    let mut builder = ConfigurationBuilder::new();
    builder.add_map(map(source));
    builder.add_value(key, "Hello World");

    let err = builder.build().unwrap_err();
    assert!(matches!(err, Error::Override(_)), "unexpected error: {err:?}");
}

#[rstest]
fn test_out_of_range_override_kind() {
    let mut builder = ConfigurationBuilder::new();
    builder.add_map(map(json!({"a": []})));
    builder.add_value("a:0", "x");

    assert!(matches!(
        builder.build(),
        Err(Error::Override(OverrideError::IndexOutOfRange { .. }))
    ));
}

#[rstest]
fn test_build_is_idempotent() {
    let mut builder = ConfigurationBuilder::new();
    builder
        .add_map(map(json!({"a": {"b": [1, 2, 3]}})))
        .add_value("a__b__1", 20);

    let first = builder.build().unwrap();
    let second = builder.build().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.values(), map(json!({"a": {"b": [1, 20, 3]}})));
}

#[rstest]
fn test_sources_are_reread_on_every_build() {
    let mut builder = ConfigurationBuilder::new();
    builder.add_source(CountingSource::default());

    assert_eq!(builder.build().unwrap().attr("count").unwrap(), json!(1));
    assert_eq!(builder.build().unwrap().attr("count").unwrap(), json!(2));
}

#[rstest]
fn test_missing_required_file_aborts_build() {
    let mut builder = ConfigurationBuilder::new();
    builder.add_map(map(json!({"a": 1})));
    builder.add_source(FileSource::yaml("noop.no"));

    assert!(matches!(builder.build(), Err(Error::MissingSource(_))));
}

#[rstest]
fn test_missing_optional_file_is_skipped() {
    let mut builder = ConfigurationBuilder::new();
    builder.add_map(map(json!({"a": 1})));
    builder.add_source(FileSource::toml("noop.no").optional(true));

    assert_eq!(builder.build_values().unwrap(), map(json!({"a": 1})));
}

#[rstest]
fn test_env_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{"foo": "foo", "logging": {"level": "INFO", "format": "text"}}"#,
    )
    .unwrap();

    temp_env::with_var("LAYERCFG_APP_LOGGING__LEVEL", Some("DEBUG"), || {
        let mut builder = ConfigurationBuilder::new();
        builder
            .add_source(FileSource::json(&path))
            .add_source(EnvironmentVariables::with_prefix("LAYERCFG_APP_"));

        let config = builder.build().unwrap();
        let logging = config.attr("logging").unwrap();
        assert_eq!(config.attr("foo").unwrap(), "foo");
        assert_eq!(logging.attr("level").unwrap(), "DEBUG");
        assert_eq!(logging.attr("format").unwrap(), "text");
    });
}

#[rstest]
fn test_env_overrides_sequence_and_nested_values() {
    temp_env::with_vars(
        vec![
            ("LAYERCFG_SEQ_b__c__d", Some("200")),
            ("LAYERCFG_SEQ_a__0", Some("3")),
        ],
        || {
            let mut builder = ConfigurationBuilder::new();
            builder
                .add_map(map(json!({"a": [1, 2, 3], "b": {"c": {"d": 100}}})))
                .add_source(EnvironmentVariables::with_prefix("LAYERCFG_SEQ_"));

            let config = builder.build().unwrap();
            assert_eq!(
                Value::Object(config.values()),
                json!({"a": ["3", 2, 3], "b": {"c": {"d": "200"}}})
            );
        },
    );
}

#[rstest]
fn test_builder_display() {
    let mut builder = ConfigurationBuilder::new();
    builder.add_source(FooSource);
    builder.add_source(EnvironmentVariables::new());

    assert_eq!(
        builder.to_string(),
        "<ConfigurationBuilder [<FooSource>, <EnvironmentVariables>]>"
    );
}

#[rstest]
fn test_with_sources_keeps_order() {
    let builder = ConfigurationBuilder::with_sources([
        Box::new(MapSource::single("a", "first")) as Box<dyn ConfigurationSource>,
        Box::new(MapSource::single("a", "second")),
    ]);

    assert_eq!(builder.sources().len(), 2);
    assert_eq!(builder.build().unwrap().item("a").unwrap(), "second");
}

#[rstest]
fn test_concurrent_builds_are_independent() {
    let mut builder = ConfigurationBuilder::new();
    builder.add_map(map(json!({"a": {"b": 1}})));
    builder.add_value("a:c", 2);

    let results: Vec<Configuration> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| builder.build().unwrap())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for config in &results {
        assert_eq!(config.values(), map(json!({"a": {"b": 1, "c": 2}})));
    }
}
