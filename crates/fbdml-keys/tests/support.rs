//! Tests for configuring generated-keys support from the connection
//! property and the server version.

mod common;
use common::*;

use std::collections::BTreeSet;

use fbdml_keys::{
    DisabledReason, GeneratedKeysMode, GeneratedKeysSupport, KeysError, KeysRequest, Query,
    QueryType,
};

fn configure(mode: &str, server_version: &str) -> GeneratedKeysSupport {
    let mode: GeneratedKeysMode = mode.parse().unwrap_or_default();
    GeneratedKeysSupport::configure(&mode, version(server_version))
}

#[test]
fn default_enables_everything_the_server_supports() {
    for mode in ["", "default", "DEFAULT"] {
        let support = configure(mode, "3.0");
        assert_eq!(support.supported_query_types(), all_types());
        assert!(support.supports_get_generated_keys());
    }
    assert_eq!(
        configure("default", "2.0"),
        GeneratedKeysSupport::Enabled(BTreeSet::from([QueryType::Insert]))
    );
}

#[test]
fn old_server_disables_support() {
    for mode in ["default", "insert"] {
        assert_eq!(
            configure(mode, "1.5"),
            GeneratedKeysSupport::Disabled(DisabledReason::NoReturningSupport)
        );
    }
}

#[test]
fn disabled_and_ignored() {
    let disabled = configure("disabled", "4.0");
    assert_eq!(
        disabled,
        GeneratedKeysSupport::Disabled(DisabledReason::ExplicitlyDisabled)
    );
    assert!(!disabled.supports_get_generated_keys());
    assert!(disabled.supported_query_types().is_empty());

    let ignored = configure("IGNORED", "1.5");
    assert_eq!(ignored, GeneratedKeysSupport::Ignored);
    assert!(!ignored.supports_get_generated_keys());
}

#[test]
fn list_is_intersected_with_server_support() {
    assert_eq!(
        configure("insert,update", "2.5").supported_query_types(),
        BTreeSet::from([QueryType::Insert, QueryType::Update])
    );
    assert_eq!(
        configure("update, delete", "2.0"),
        GeneratedKeysSupport::Ignored
    );
    assert_eq!(
        configure("update, insert", "2.0").supported_query_types(),
        BTreeSet::from([QueryType::Insert])
    );
    assert_eq!(configure("merge", "4.0"), GeneratedKeysSupport::Ignored);
}

#[test]
fn enabled_builds_queries() {
    let support = configure("insert", "4.0");
    let metadata = metadata(4, 3);

    let query = support
        .build_query(INSERT, KeysRequest::ReturnGeneratedKeys, &metadata)
        .unwrap();
    assert_eq!(query, Query::new(true, format!("{INSERT}\nRETURNING *")));

    let names = vec!["ID".to_string()];
    let query = support
        .build_query(INSERT, KeysRequest::ColumnNames(&names), &metadata)
        .unwrap();
    assert_eq!(query.sql, format!("{INSERT}\nRETURNING ID"));

    let query = support
        .build_query(INSERT, KeysRequest::ColumnIndexes(&[2]), &metadata)
        .unwrap();
    assert_eq!(query.sql, format!("{INSERT}\nRETURNING \"NAME\""));

    let update = "UPDATE generated_keys_tbl SET name = ?";
    let query = support
        .build_query(update, KeysRequest::ReturnGeneratedKeys, &metadata)
        .unwrap();
    assert_eq!(query, Query::new(false, update));
}

#[test]
fn disabled_rejects_key_requests() {
    let support = configure("disabled", "4.0");
    let metadata = metadata(4, 3);
    assert_eq!(
        support.build_query(INSERT, KeysRequest::NoGeneratedKeys, &metadata),
        Ok(Query::new(false, INSERT))
    );
    for request in [
        KeysRequest::ReturnGeneratedKeys,
        KeysRequest::ColumnIndexes(&[1]),
    ] {
        assert_eq!(
            support.build_query(INSERT, request, &metadata),
            Err(KeysError::SupportNotAvailable(
                DisabledReason::ExplicitlyDisabled
            ))
        );
    }

    let support = configure("default", "1.5");
    let err = support
        .build_query(INSERT, KeysRequest::ReturnGeneratedKeys, &metadata)
        .unwrap_err();
    assert!(err.to_string().contains("support was added in Firebird 2.0"));
}

#[test]
fn ignored_never_rewrites() {
    let support = configure("ignored", "4.0");
    let metadata = metadata(4, 3);
    let names = vec!["ID".to_string()];
    for request in [
        KeysRequest::NoGeneratedKeys,
        KeysRequest::ReturnGeneratedKeys,
        KeysRequest::ColumnIndexes(&[1]),
        KeysRequest::ColumnNames(&names),
    ] {
        assert_eq!(
            support.build_query(INSERT, request, &metadata),
            Ok(Query::new(false, INSERT))
        );
    }
}

#[test]
fn invalid_flag() {
    assert_eq!(
        KeysRequest::from_flag(0),
        Err(KeysError::InvalidOption(0))
    );
}
