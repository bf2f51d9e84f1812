//! Server versions and the statement kinds they can return keys for.

use core::fmt;
use std::collections::BTreeSet;
use std::str::FromStr;

use fbdml_core::StatementType;
use serde::Serialize;

use crate::error::KeysError;

/// A Firebird server version, compared by major then minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
}

impl ServerVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Returns true if the server accepts `RETURNING *`.
    #[must_use]
    pub const fn supports_returning_all(&self) -> bool {
        self.major >= 4
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ServerVersion {
    type Err = KeysError;

    /// Parses `MAJOR.MINOR`, or a bare `MAJOR` meaning `MAJOR.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || KeysError::InvalidServerVersion(s.to_string());
        let trimmed = s.trim();
        let (major, minor) = trimmed.split_once('.').unwrap_or((trimmed, "0"));
        let major = major.parse().map_err(|_| invalid())?;
        let minor = minor.parse().map_err(|_| invalid())?;
        Ok(Self { major, minor })
    }
}

/// Statement kinds that generated keys can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryType {
    Insert,
    Update,
    Delete,
    UpdateOrInsert,
}

impl QueryType {
    /// All query types.
    pub const ALL: [Self; 4] = [
        Self::Insert,
        Self::Update,
        Self::Delete,
        Self::UpdateOrInsert,
    ];

    /// Returns the name used in the connection property.
    #[must_use]
    pub const fn config_name(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::UpdateOrInsert => "update_or_insert",
        }
    }

    /// Looks up a query type by its connection property name, ignoring case.
    #[must_use]
    pub fn from_config_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.config_name().eq_ignore_ascii_case(name))
    }

    /// Query types whose statements accept a `RETURNING` clause on the
    /// given server version.
    #[must_use]
    pub fn returning_support_for(version: ServerVersion) -> BTreeSet<Self> {
        if version >= ServerVersion::new(2, 1) {
            Self::ALL.into_iter().collect()
        } else if version >= ServerVersion::new(2, 0) {
            BTreeSet::from([Self::Insert])
        } else {
            BTreeSet::new()
        }
    }
}

impl From<StatementType> for QueryType {
    fn from(statement_type: StatementType) -> Self {
        match statement_type {
            StatementType::Insert => Self::Insert,
            StatementType::Update => Self::Update,
            StatementType::Delete => Self::Delete,
            StatementType::UpdateOrInsert => Self::UpdateOrInsert,
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_version() {
        assert_eq!("4.0".parse(), Ok(ServerVersion::new(4, 0)));
        assert_eq!(" 2.5 ".parse(), Ok(ServerVersion::new(2, 5)));
        assert_eq!("3".parse(), Ok(ServerVersion::new(3, 0)));
        assert_eq!(
            "four".parse::<ServerVersion>(),
            Err(KeysError::InvalidServerVersion("four".into()))
        );
        assert!("4.x".parse::<ServerVersion>().is_err());
        assert!("".parse::<ServerVersion>().is_err());
    }

    #[test]
    fn version_ordering() {
        assert!(ServerVersion::new(2, 1) > ServerVersion::new(2, 0));
        assert!(ServerVersion::new(3, 0) > ServerVersion::new(2, 5));
        assert!(!ServerVersion::new(3, 0).supports_returning_all());
        assert!(ServerVersion::new(4, 0).supports_returning_all());
        assert_eq!(ServerVersion::new(2, 5).to_string(), "2.5");
    }

    #[test]
    fn config_names() {
        assert_eq!(QueryType::from_config_name("INSERT"), Some(QueryType::Insert));
        assert_eq!(
            QueryType::from_config_name("Update_Or_Insert"),
            Some(QueryType::UpdateOrInsert)
        );
        assert_eq!(QueryType::from_config_name("merge"), None);
    }

    #[test]
    fn support_by_version() {
        assert!(QueryType::returning_support_for(ServerVersion::new(1, 5)).is_empty());
        assert_eq!(
            QueryType::returning_support_for(ServerVersion::new(2, 0)),
            BTreeSet::from([QueryType::Insert])
        );
        for version in [ServerVersion::new(2, 1), ServerVersion::new(5, 0)] {
            assert_eq!(QueryType::returning_support_for(version).len(), 4);
        }
    }

    #[test]
    fn from_statement_type() {
        assert_eq!(
            QueryType::from(StatementType::UpdateOrInsert),
            QueryType::UpdateOrInsert
        );
        assert_eq!(QueryType::from(StatementType::Delete), QueryType::Delete);
    }
}
