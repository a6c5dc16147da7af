// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! File-backed SQLite databases with key-value metadata.
//!
//! Each database is one `.db` file in a storage directory. A [`Database`]
//! handle offers table creation and introspection, row reads and writes,
//! raw SQL passthrough and metadata kept in a reserved table. A
//! [`Catalog`] lists every database in the directory.
//!
//! **Architecture**: this is the storage layer; `dbkeeper-shell` is the
//! interactive front end on top of it.
//!
//! Every operation opens its own connection and closes it before
//! returning. No connection is pooled or held between calls.
//!
//! # Example
//!
//! ```ignore
//! use dbkeeper_store::{Catalog, Metadata, Record, Value};
//!
//! let catalog = Catalog::new("data");
//! let db = catalog.database("shop");
//! db.open_or_create(Some(&Metadata::new().with("description", "test")))?;
//! db.create_table("items", "id INTEGER PRIMARY KEY, name TEXT NOT NULL")?;
//!
//! let mut record = Record::new();
//! record.insert("name".into(), Value::Text("Widget".into()));
//! db.insert("items", &record)?;
//! assert_eq!(db.count("items", "1=1")?, 1);
//! ```

mod catalog;
mod connection;
mod error;
pub mod metadata;
mod query;
mod schema;
mod types;
mod write;

pub use catalog::{Catalog, DEFAULT_DATA_DIR};
pub use connection::{DB_SUFFIX, Database, OpenMode, sanitize_file_name};
pub use error::{Error, Result};
pub use metadata::{MetaValue, Metadata};
pub use schema::{METADATA_TABLE, RESERVED_WORDS, quote_ident, validate_table_name};
pub use types::*;
