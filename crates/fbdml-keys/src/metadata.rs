//! Access to the table metadata needed to list a table's columns.

use std::collections::HashMap;

use crate::version::ServerVersion;

/// Source of connection and table metadata.
///
/// Implementations are expected to query the system tables of the
/// connected database. Table names passed to [`column_names`] are already
/// normalized with [`normalize_object_name`].
///
/// [`column_names`]: TableMetadata::column_names
pub trait TableMetadata {
    /// Version of the connected server.
    fn server_version(&self) -> ServerVersion;

    /// SQL dialect of the connection.
    fn connection_dialect(&self) -> u8;

    /// Column names of `table` in ordinal order. Position 1 is the first
    /// element. An unknown table yields an empty list.
    fn column_names(&self, table: &str) -> Vec<String>;
}

/// In-memory [`TableMetadata`], keyed by normalized table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMetadata {
    version: ServerVersion,
    dialect: u8,
    tables: HashMap<String, Vec<String>>,
}

impl StaticMetadata {
    #[must_use]
    pub fn new(version: ServerVersion, dialect: u8) -> Self {
        Self {
            version,
            dialect,
            tables: HashMap::new(),
        }
    }

    /// Registers a table with its columns in ordinal order.
    #[must_use]
    pub fn with_table<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .insert(name.into(), columns.into_iter().map(Into::into).collect());
        self
    }
}

impl TableMetadata for StaticMetadata {
    fn server_version(&self) -> ServerVersion {
        self.version
    }

    fn connection_dialect(&self) -> u8 {
        self.dialect
    }

    fn column_names(&self, table: &str) -> Vec<String> {
        self.tables.get(table).cloned().unwrap_or_default()
    }
}

/// Normalizes a table name as written in a statement to the form stored in
/// the system tables.
///
/// Quoted names lose their quotes and have doubled quotes collapsed;
/// unquoted names are upper-cased.
#[must_use]
pub fn normalize_object_name(name: &str) -> String {
    let name = name.trim();
    if name.len() > 2 && name.starts_with('"') && name.ends_with('"') {
        name[1..name.len() - 1].replace("\"\"", "\"")
    } else {
        name.to_uppercase()
    }
}
