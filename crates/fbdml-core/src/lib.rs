//! # fbdml-core
//!
//! Statement analysis for Firebird DML, as needed to emulate generated-keys
//! retrieval with a `RETURNING` clause.
//!
//! This crate provides:
//! - A case-insensitive, rewindable character stream
//! - A hand-written lexer that keeps whitespace and comments on a hidden channel
//! - A recursive descent parser for INSERT, UPDATE, DELETE and UPDATE OR INSERT
//! - A [`StatementModel`] holding the table, columns, values and RETURNING columns
//!
//! The parser never rewrites the statement. Names and values are reported
//! exactly as written:
//!
//! ```rust
//! use fbdml_core::{parse, StatementType};
//!
//! let parsed = parse("INSERT INTO \"Orders\" (id, note) VALUES (?, 'a' || 'b')").unwrap();
//! assert!(parsed.is_clean());
//!
//! let model = &parsed.model;
//! assert_eq!(model.statement_type(), Some(StatementType::Insert));
//! assert_eq!(model.table_name(), Some("\"Orders\""));
//! assert_eq!(model.columns(), ["id", "note"]);
//! assert_eq!(model.values(), ["?", "'a' || 'b'"]);
//! assert!(!model.has_returning_columns());
//! ```
//!
//! ## Mismatches
//!
//! Malformed input does not fail the parse. Problems are counted and
//! described in [`Diagnostics`]; a statement with a non-zero mismatch count
//! should be executed unmodified:
//!
//! ```rust
//! let parsed = fbdml_core::parse("INSERT INTO").unwrap();
//! assert_eq!(parsed.mismatch_count(), 1);
//! assert_eq!(parsed.model.statement_type(), None);
//! ```

pub mod diagnostics;
pub mod lexer;
pub mod model;
pub mod parser;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use lexer::{Keyword, Lexer, Span, Token, TokenKind};
pub use model::{ParsedStatement, StatementModel, StatementType};
pub use parser::{ParseError, Parser};

/// Parses a single DML statement.
///
/// # Errors
///
/// Returns a `ParseError` if the statement is empty, is not a DML statement
/// this crate understands, or nests values too deeply.
pub fn parse(sql: &str) -> Result<ParsedStatement, ParseError> {
    Parser::new(sql).parse_statement()
}
