//! Connection-level configuration of generated-keys support.

use core::convert::Infallible;
use core::fmt;
use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::builder::{GeneratedKeysQueryBuilder, Query};
use crate::error::{KeysError, Result};
use crate::metadata::TableMetadata;
use crate::version::{QueryType, ServerVersion};

/// JDBC `Statement.RETURN_GENERATED_KEYS`.
pub const RETURN_GENERATED_KEYS: i32 = 1;
/// JDBC `Statement.NO_GENERATED_KEYS`.
pub const NO_GENERATED_KEYS: i32 = 2;

/// Value of the `generatedKeysEnabled` connection property.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GeneratedKeysMode {
    /// Every query type the server supports.
    #[default]
    Default,
    /// Requests for generated keys fail.
    Disabled,
    /// Requests for generated keys are silently ignored.
    Ignored,
    /// Only the listed query types.
    Only(BTreeSet<QueryType>),
}

impl FromStr for GeneratedKeysMode {
    type Err = Infallible;

    /// Parses the property value. Unknown names in a list are skipped.
    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        Ok(match value.as_str() {
            "" | "default" => Self::Default,
            "disabled" => Self::Disabled,
            "ignored" => Self::Ignored,
            list => Self::Only(
                list.split(',')
                    .map(str::trim)
                    .filter_map(|name| {
                        let query_type = QueryType::from_config_name(name);
                        if query_type.is_none() {
                            debug!(name, "Skipping unknown generated keys query type");
                        }
                        query_type
                    })
                    .collect(),
            ),
        })
    }
}

/// Why generated keys support is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisabledReason {
    /// The connection property is `disabled`.
    ExplicitlyDisabled,
    /// The server version has no RETURNING clause.
    NoReturningSupport,
}

impl fmt::Display for DisabledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExplicitlyDisabled => "disabled through connection property",
            Self::NoReturningSupport => {
                "This version of Firebird does not support retrieving generated keys \
                 (support was added in Firebird 2.0)"
            }
        })
    }
}

/// The generated-keys option requested when preparing a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeysRequest<'r> {
    NoGeneratedKeys,
    ReturnGeneratedKeys,
    ColumnIndexes(&'r [usize]),
    ColumnNames(&'r [String]),
}

impl KeysRequest<'_> {
    /// Maps a JDBC `autoGeneratedKeys` flag.
    ///
    /// # Errors
    ///
    /// Returns [`KeysError::InvalidOption`] for any other value than
    /// [`RETURN_GENERATED_KEYS`] or [`NO_GENERATED_KEYS`].
    pub const fn from_flag(flag: i32) -> Result<Self> {
        match flag {
            RETURN_GENERATED_KEYS => Ok(Self::ReturnGeneratedKeys),
            NO_GENERATED_KEYS => Ok(Self::NoGeneratedKeys),
            other => Err(KeysError::InvalidOption(other)),
        }
    }
}

/// Generated-keys support of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedKeysSupport {
    /// Keys are returned for the listed query types.
    Enabled(BTreeSet<QueryType>),
    Disabled(DisabledReason),
    Ignored,
}

impl GeneratedKeysSupport {
    /// Resolves the configured mode against what the server supports.
    #[must_use]
    pub fn configure(mode: &GeneratedKeysMode, version: ServerVersion) -> Self {
        let supported = match mode {
            GeneratedKeysMode::Disabled => {
                return Self::Disabled(DisabledReason::ExplicitlyDisabled)
            }
            GeneratedKeysMode::Ignored => return Self::Ignored,
            GeneratedKeysMode::Default | GeneratedKeysMode::Only(_) => {
                QueryType::returning_support_for(version)
            }
        };
        if supported.is_empty() {
            debug!(%version, "Server has no RETURNING support");
            return Self::Disabled(DisabledReason::NoReturningSupport);
        }
        match mode {
            GeneratedKeysMode::Only(requested) => {
                let enabled: BTreeSet<_> = supported.intersection(requested).copied().collect();
                if enabled.is_empty() {
                    Self::Ignored
                } else {
                    Self::Enabled(enabled)
                }
            }
            _ => Self::Enabled(supported),
        }
    }

    /// Query types keys are returned for.
    #[must_use]
    pub fn supported_query_types(&self) -> BTreeSet<QueryType> {
        match self {
            Self::Enabled(types) => types.clone(),
            Self::Disabled(_) | Self::Ignored => BTreeSet::new(),
        }
    }

    /// Returns true if generated keys can be requested at all.
    #[must_use]
    pub const fn supports_get_generated_keys(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// Builds the query to execute for `sql`.
    ///
    /// # Errors
    ///
    /// Returns [`KeysError::SupportNotAvailable`] if support is disabled and
    /// keys were requested, or any error of the query builder.
    pub fn build_query(
        &self,
        sql: &str,
        request: KeysRequest<'_>,
        metadata: &dyn TableMetadata,
    ) -> Result<Query> {
        match self {
            Self::Enabled(types) => {
                let builder = GeneratedKeysQueryBuilder::create(sql, types);
                match request {
                    KeysRequest::NoGeneratedKeys => Ok(builder.for_no_generated_keys()),
                    KeysRequest::ReturnGeneratedKeys => {
                        builder.for_return_generated_keys(metadata)
                    }
                    KeysRequest::ColumnIndexes(indexes) => {
                        builder.for_columns_by_index(indexes, metadata)
                    }
                    KeysRequest::ColumnNames(names) => builder.for_columns_by_name(names),
                }
            }
            Self::Disabled(reason) => match request {
                KeysRequest::NoGeneratedKeys => Ok(Query::new(false, sql)),
                _ => Err(KeysError::SupportNotAvailable(*reason)),
            },
            Self::Ignored => Ok(Query::new(false, sql)),
        }
    }
}
