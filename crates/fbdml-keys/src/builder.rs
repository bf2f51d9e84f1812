//! Rewrites a statement so that executing it returns generated keys.

use std::collections::BTreeSet;

use fbdml_core::{ParsedStatement, StatementModel};
use serde::Serialize;
use tracing::debug;

use crate::error::{KeysError, Result};
use crate::metadata::{TableMetadata, normalize_object_name};
use crate::quote::QuoteStrategy;
use crate::version::QueryType;

/// A statement ready for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    /// True if executing `sql` produces generated keys.
    pub generates_keys: bool,
    pub sql: String,
}

impl Query {
    #[must_use]
    pub fn new(generates_keys: bool, sql: impl Into<String>) -> Self {
        Self {
            generates_keys,
            sql: sql.into(),
        }
    }
}

/// Builds generated-keys queries for one statement.
///
/// The statement is parsed once, on creation. If it cannot be parsed, or
/// parsing reported any mismatch, every operation returns the statement
/// unmodified.
#[derive(Debug, Clone)]
pub struct GeneratedKeysQueryBuilder<'a> {
    original_sql: &'a str,
    statement: Option<StatementModel>,
    supported: BTreeSet<QueryType>,
}

impl<'a> GeneratedKeysQueryBuilder<'a> {
    /// Parses `sql` and creates a builder for it.
    #[must_use]
    pub fn create(sql: &'a str, supported: &BTreeSet<QueryType>) -> Self {
        let statement = match fbdml_core::parse(sql) {
            Ok(parsed) => identify(parsed),
            Err(e) => {
                debug!(error = %e, sql, "Statement not parsed, keeping it unmodified");
                None
            }
        };
        Self {
            original_sql: sql,
            statement,
            supported: supported.clone(),
        }
    }

    /// The parsed statement, if it was identified.
    #[must_use]
    pub const fn statement(&self) -> Option<&StatementModel> {
        self.statement.as_ref()
    }

    /// Returns true if the statement kind is one of the supported query types.
    #[must_use]
    pub fn is_supported_type(&self) -> bool {
        self.statement
            .as_ref()
            .and_then(StatementModel::statement_type)
            .is_some_and(|t| self.supported.contains(&QueryType::from(t)))
    }

    /// Query for the `NO_GENERATED_KEYS` option.
    ///
    /// A statement that already has a RETURNING clause still produces keys,
    /// whatever the supported query types are.
    #[must_use]
    pub fn for_no_generated_keys(&self) -> Query {
        Query::new(self.has_returning(), self.original_sql)
    }

    /// Query for the `RETURN_GENERATED_KEYS` option: returns all columns.
    ///
    /// # Errors
    ///
    /// Returns [`KeysError::NoColumnsFound`] if all columns must be listed
    /// and the metadata knows none for the table.
    pub fn for_return_generated_keys(&self, metadata: &dyn TableMetadata) -> Result<Query> {
        if self.has_returning() {
            return Ok(self.unchanged(true));
        }
        if !self.is_supported_type() {
            return Ok(self.unchanged(false));
        }
        if metadata.server_version().supports_returning_all() {
            return Ok(self.append_returning(&["*"], QuoteStrategy::NoQuotes));
        }
        let table = self.table_name();
        let columns = metadata.column_names(&normalize_object_name(table));
        if columns.is_empty() {
            return Err(KeysError::NoColumnsFound(table.to_string()));
        }
        let quote = QuoteStrategy::for_dialect(metadata.connection_dialect());
        Ok(self.append_returning(&columns, quote))
    }

    /// Query returning the columns at the given 1-based positions, in the
    /// order requested.
    ///
    /// # Errors
    ///
    /// Returns an error if `indexes` is empty, the table has no columns, or
    /// a position does not exist.
    pub fn for_columns_by_index(
        &self,
        indexes: &[usize],
        metadata: &dyn TableMetadata,
    ) -> Result<Query> {
        if self.has_returning() {
            return Ok(self.unchanged(true));
        }
        if indexes.is_empty() {
            return Err(KeysError::EmptyColumnArray("columnIndexes"));
        }
        if !self.is_supported_type() {
            return Ok(self.unchanged(false));
        }
        let table = self.table_name();
        let all_columns = metadata.column_names(&normalize_object_name(table));
        if all_columns.is_empty() {
            return Err(KeysError::NoColumnsFound(table.to_string()));
        }
        let columns = indexes
            .iter()
            .map(|&position| {
                position
                    .checked_sub(1)
                    .and_then(|i| all_columns.get(i))
                    .cloned()
                    .ok_or_else(|| KeysError::InvalidColumnPosition {
                        position,
                        table: table.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let quote = QuoteStrategy::for_dialect(metadata.connection_dialect());
        Ok(self.append_returning(&columns, quote))
    }

    /// Query returning the named columns. Names are used as given, so they
    /// must already be quoted where needed.
    ///
    /// # Errors
    ///
    /// Returns [`KeysError::EmptyColumnArray`] if `names` is empty.
    pub fn for_columns_by_name<S: AsRef<str>>(&self, names: &[S]) -> Result<Query> {
        if self.has_returning() {
            return Ok(self.unchanged(true));
        }
        if names.is_empty() {
            return Err(KeysError::EmptyColumnArray("columnNames"));
        }
        if !self.is_supported_type() {
            return Ok(self.unchanged(false));
        }
        Ok(self.append_returning(names, QuoteStrategy::NoQuotes))
    }

    fn has_returning(&self) -> bool {
        self.statement
            .as_ref()
            .is_some_and(StatementModel::has_returning_columns)
    }

    fn table_name(&self) -> &str {
        self.statement
            .as_ref()
            .and_then(StatementModel::table_name)
            .unwrap_or_default()
    }

    fn unchanged(&self, generates_keys: bool) -> Query {
        Query::new(generates_keys, self.original_sql)
    }

    fn append_returning<S: AsRef<str>>(&self, columns: &[S], quote: QuoteStrategy) -> Query {
        let trimmed = self.original_sql.trim_end();
        let mut sql = trimmed.strip_suffix(';').unwrap_or(trimmed).to_string();
        sql.push_str("\nRETURNING ");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                sql.push(',');
            }
            quote.append_quoted(column.as_ref(), &mut sql);
        }
        Query::new(true, sql)
    }
}

/// Keeps the model only if the statement parsed cleanly into a known kind.
fn identify(parsed: ParsedStatement) -> Option<StatementModel> {
    if parsed.mismatch_count() > 0 {
        debug!(
            mismatches = parsed.mismatch_count(),
            "Statement parsed with mismatches, keeping it unmodified"
        );
        return None;
    }
    parsed.model.statement_type()?;
    Some(parsed.model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::StaticMetadata;
    use crate::version::ServerVersion;

    fn all_types() -> BTreeSet<QueryType> {
        QueryType::ALL.into_iter().collect()
    }

    #[test]
    fn appends_after_stripping_semicolon() {
        let builder =
            GeneratedKeysQueryBuilder::create("INSERT INTO T (a) VALUES (1) ; \n", &all_types());
        let query = builder.for_columns_by_name(&["ID"]).unwrap();
        assert_eq!(query.sql, "INSERT INTO T (a) VALUES (1) \nRETURNING ID");
    }

    #[test]
    fn only_one_semicolon_is_stripped() {
        let builder = GeneratedKeysQueryBuilder::create("DELETE FROM T;", &all_types());
        let query = builder.for_columns_by_name(&["A", "B"]).unwrap();
        assert!(query.generates_keys);
        assert_eq!(query.sql, "DELETE FROM T\nRETURNING A,B");
    }

    #[test]
    fn unparsed_statement_is_unidentified() {
        let builder = GeneratedKeysQueryBuilder::create("SELECT 1 FROM RDB$DATABASE", &all_types());
        assert!(builder.statement().is_none());
        assert!(!builder.is_supported_type());

        let builder = GeneratedKeysQueryBuilder::create("INSERT INTO", &all_types());
        assert!(builder.statement().is_none());
    }

    #[test]
    fn unsupported_type() {
        let supported = BTreeSet::from([QueryType::Insert]);
        let builder = GeneratedKeysQueryBuilder::create("DELETE FROM T", &supported);
        assert!(builder.statement().is_some());
        assert!(!builder.is_supported_type());

        let metadata = StaticMetadata::new(ServerVersion::new(4, 0), 3);
        let query = builder.for_return_generated_keys(&metadata).unwrap();
        assert_eq!(query, Query::new(false, "DELETE FROM T"));
    }

    #[test]
    fn index_zero_is_invalid() {
        let builder =
            GeneratedKeysQueryBuilder::create("INSERT INTO t (a) VALUES (1)", &all_types());
        let metadata = StaticMetadata::new(ServerVersion::new(3, 0), 3).with_table("T", ["A"]);
        assert_eq!(
            builder.for_columns_by_index(&[0], &metadata),
            Err(KeysError::InvalidColumnPosition {
                position: 0,
                table: "t".into()
            })
        );
    }
}
