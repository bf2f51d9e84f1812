#![allow(dead_code)]

use fbdml_core::{ParseError, ParsedStatement, StatementModel, StatementType, parse};

pub fn parse_ok(sql: &str) -> ParsedStatement {
    parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    parse(sql).expect_err(&format!("Expected parse error for: {sql}"))
}

/// Parses `sql` and asserts that no mismatch was recorded.
pub fn parse_clean(sql: &str) -> StatementModel {
    let parsed = parse_ok(sql);
    assert!(
        parsed.is_clean(),
        "Expected clean parse of: {sql}\nDiagnostics: {:?}",
        parsed.messages()
    );
    parsed.model
}

/// Parses `sql` and asserts that at least one mismatch was recorded.
pub fn parse_dirty(sql: &str) -> ParsedStatement {
    let parsed = parse_ok(sql);
    assert!(
        !parsed.is_clean(),
        "Expected mismatches for: {sql}\nModel: {:?}",
        parsed.model
    );
    parsed
}

pub fn parse_insert(sql: &str) -> StatementModel {
    let model = parse_clean(sql);
    assert_eq!(model.statement_type(), Some(StatementType::Insert), "{sql}");
    model
}

pub fn parse_update(sql: &str) -> StatementModel {
    let model = parse_clean(sql);
    assert_eq!(model.statement_type(), Some(StatementType::Update), "{sql}");
    model
}

pub fn parse_delete(sql: &str) -> StatementModel {
    let model = parse_clean(sql);
    assert_eq!(model.statement_type(), Some(StatementType::Delete), "{sql}");
    model
}

pub fn parse_update_or_insert(sql: &str) -> StatementModel {
    let model = parse_clean(sql);
    assert_eq!(
        model.statement_type(),
        Some(StatementType::UpdateOrInsert),
        "{sql}"
    );
    model
}

/// Returns the values captured for a single-column INSERT of `value`.
pub fn captured_value(value: &str) -> String {
    let sql = format!("INSERT INTO T (a) VALUES ({value})");
    let model = parse_insert(&sql);
    assert_eq!(model.values().len(), 1, "{sql}");
    model.values()[0].clone()
}
