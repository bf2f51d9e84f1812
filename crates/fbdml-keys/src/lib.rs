//! # fbdml-keys
//!
//! Generated-keys retrieval for Firebird through a `RETURNING` clause.
//!
//! A statement is analyzed with [`fbdml_core`]. When it is an INSERT,
//! UPDATE, DELETE or UPDATE OR INSERT without a RETURNING clause, the
//! requested columns are appended:
//!
//! ```rust
//! use fbdml_keys::{
//!     GeneratedKeysMode, GeneratedKeysSupport, KeysRequest, ServerVersion, StaticMetadata,
//! };
//!
//! let version = ServerVersion::new(3, 0);
//! let metadata = StaticMetadata::new(version, 3).with_table("ORDERS", ["ID", "NOTE"]);
//! let support = GeneratedKeysSupport::configure(&GeneratedKeysMode::Default, version);
//!
//! let query = support
//!     .build_query(
//!         "INSERT INTO orders (note) VALUES (?)",
//!         KeysRequest::ReturnGeneratedKeys,
//!         &metadata,
//!     )
//!     .unwrap();
//! assert!(query.generates_keys);
//! assert_eq!(
//!     query.sql,
//!     "INSERT INTO orders (note) VALUES (?)\nRETURNING \"ID\",\"NOTE\""
//! );
//! ```
//!
//! Statements that cannot be analyzed, or that parse with mismatches, are
//! always returned unmodified.

pub mod builder;
pub mod error;
pub mod metadata;
pub mod quote;
pub mod support;
pub mod version;

pub use builder::{GeneratedKeysQueryBuilder, Query};
pub use error::{KeysError, Result};
pub use metadata::{StaticMetadata, TableMetadata, normalize_object_name};
pub use quote::QuoteStrategy;
pub use support::{
    DisabledReason, GeneratedKeysMode, GeneratedKeysSupport, KeysRequest, NO_GENERATED_KEYS,
    RETURN_GENERATED_KEYS,
};
pub use version::{QueryType, ServerVersion};
