//! Tests for data types accepted by CAST.

mod common;
use common::*;

fn assert_cast(data_type: &str) {
    let value = format!("CAST(? AS {data_type})");
    assert_eq!(captured_value(&value), value);
}

#[test]
fn cast_numeric_types() {
    for t in [
        "SMALLINT",
        "INTEGER",
        "INT",
        "BIGINT",
        "FLOAT",
        "DOUBLE PRECISION",
        "DECIMAL",
        "DECIMAL(18)",
        "NUMERIC(18, 4)",
    ] {
        assert_cast(t);
    }
}

#[test]
fn cast_datetime_types() {
    for t in ["DATE", "TIME", "TIMESTAMP"] {
        assert_cast(t);
    }
}

#[test]
fn cast_character_types() {
    for t in [
        "CHAR",
        "CHAR(1)",
        "VARCHAR(100)",
        "VARCHAR(100) CHARACTER SET UTF8",
        "char(10) character set win1252",
    ] {
        assert_cast(t);
    }
}

#[test]
fn cast_blob_types() {
    for t in [
        "BLOB",
        "BLOB SUB_TYPE 1",
        "BLOB SUB_TYPE TEXT",
        "BLOB SUB_TYPE TEXT SEGMENT SIZE 80",
        "BLOB SUB_TYPE TEXT CHARACTER SET UTF8",
        "BLOB(80)",
        "BLOB(80, 1)",
    ] {
        assert_cast(t);
    }
}

#[test]
fn cast_array_types() {
    for t in [
        "INTEGER[10]",
        "INTEGER[1:10]",
        "INTEGER[1 : 10]",
        "INTEGER[0:3, 1:2]",
        "VARCHAR(10)[5] CHARACTER SET UTF8",
        "DECIMAL(10, 2)[1:4]",
    ] {
        assert_cast(t);
    }
}

#[test]
fn cast_nested() {
    assert_cast("VARCHAR(20)) || CAST(1 AS INTEGER");
}

#[test]
fn cast_unknown_type_is_a_mismatch() {
    let parsed = parse_dirty("INSERT INTO T (a) VALUES (CAST(? AS BOOLEAN))");
    assert_eq!(parsed.model.statement_type(), None);
    assert!(parsed.model.values().is_empty());
}
