//! The facts extracted from a DML statement.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::diagnostics::Diagnostics;

/// Kind of DML statement recognized by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum StatementType {
    Insert,
    Delete,
    Update,
    UpdateOrInsert,
}

impl StatementType {
    /// Returns the statement type as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Delete => "DELETE",
            Self::Update => "UPDATE",
            Self::UpdateOrInsert => "UPDATE_OR_INSERT",
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulator filled in by the parser while it walks a statement.
///
/// Names and values are kept exactly as written in the statement: quoting,
/// qualification and case are preserved, and values are never evaluated.
/// The model does no validation of its own; a statement that parsed with
/// mismatches can leave it partially filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StatementModel {
    statement_type: Option<StatementType>,
    table_name: Option<String>,
    columns: Vec<String>,
    values: Vec<String>,
    returning_columns: Vec<String>,
    default_values: bool,
}

impl StatementModel {
    /// Creates an empty model.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            statement_type: None,
            table_name: None,
            columns: Vec::new(),
            values: Vec::new(),
            returning_columns: Vec::new(),
            default_values: false,
        }
    }

    pub fn set_statement_type(&mut self, statement_type: StatementType) {
        self.statement_type = Some(statement_type);
    }

    pub fn set_table_name(&mut self, table_name: impl Into<String>) {
        self.table_name = Some(table_name.into());
    }

    /// Appends a target column (INSERT column list or UPDATE assignment).
    pub fn add_column(&mut self, column: impl Into<String>) {
        self.columns.push(column.into());
    }

    /// Appends the raw text of a value.
    pub fn add_value(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    /// Appends a column named in the RETURNING clause.
    pub fn add_returning_column(&mut self, column: impl Into<String>) {
        self.returning_columns.push(column.into());
    }

    /// Marks the statement as `INSERT ... DEFAULT VALUES`.
    pub fn set_default_values(&mut self) {
        self.default_values = true;
    }

    #[must_use]
    pub const fn statement_type(&self) -> Option<StatementType> {
        self.statement_type
    }

    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[must_use]
    pub fn returning_columns(&self) -> &[String] {
        &self.returning_columns
    }

    #[must_use]
    pub const fn has_default_values(&self) -> bool {
        self.default_values
    }

    /// Returns true if the statement already has a RETURNING clause.
    #[must_use]
    pub fn has_returning_columns(&self) -> bool {
        !self.returning_columns.is_empty()
    }
}

/// Outcome of parsing one statement.
///
/// A parse that hit recoverable problems still produces a model; check
/// [`ParsedStatement::is_clean`] before relying on it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParsedStatement {
    pub model: StatementModel,
    pub diagnostics: Diagnostics,
}

impl ParsedStatement {
    /// Returns the number of lexical and syntactic mismatches.
    #[must_use]
    pub const fn mismatch_count(&self) -> usize {
        self.diagnostics.mismatch_count()
    }

    /// Returns the diagnostic messages in the order they were recorded.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.messages()
    }

    /// Returns true if the statement parsed without any mismatch.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.mismatch_count() == 0
    }
}
