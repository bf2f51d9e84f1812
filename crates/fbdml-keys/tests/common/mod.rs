#![allow(dead_code)]

use std::collections::BTreeSet;

use fbdml_keys::{GeneratedKeysQueryBuilder, QueryType, ServerVersion, StaticMetadata};

pub const TABLE: &str = "GENERATED_KEYS_TBL";
pub const TABLE_COLUMNS: [&str; 3] = ["ID", "NAME", "TEXT_VALUE"];

pub const INSERT: &str = "insert into generated_keys_tbl(name, text_value) values (?, ?)";

pub fn all_types() -> BTreeSet<QueryType> {
    QueryType::ALL.into_iter().collect()
}

pub fn builder(sql: &str) -> GeneratedKeysQueryBuilder<'_> {
    GeneratedKeysQueryBuilder::create(sql, &all_types())
}

/// Metadata knowing the columns of [`TABLE`].
pub fn metadata(major: u32, dialect: u8) -> StaticMetadata {
    StaticMetadata::new(ServerVersion::new(major, 0), dialect).with_table(TABLE, TABLE_COLUMNS)
}

pub fn version(s: &str) -> ServerVersion {
    s.parse()
        .unwrap_or_else(|e| panic!("Invalid version {s}: {e}"))
}
