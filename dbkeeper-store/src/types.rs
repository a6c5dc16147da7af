// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! Row and schema types returned by database operations.

use std::collections::BTreeMap;
use std::path::PathBuf;

pub use rusqlite::types::Value;

use crate::metadata::Metadata;

/// Column values for an insert, keyed by column name.
pub type Record = BTreeMap<String, Value>;

/// One column of a table, as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Position of the column in the table (0-based)
    pub cid: i64,
    /// Column name
    pub name: String,
    /// Declared type, empty if none was declared
    pub declared_type: String,
    /// Whether the column is declared NOT NULL
    pub not_null: bool,
    /// Declared default expression, as written in the definition
    pub default_value: Option<String>,
    /// Whether the column is part of the primary key
    pub primary_key: bool,
}

/// Column names and rows of a query result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Rows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any cell in the result holds `text`.
    pub fn contains_text(&self, text: &str) -> bool {
        self.rows
            .iter()
            .flatten()
            .any(|v| matches!(v, Value::Text(t) if t == text))
    }
}

/// Outcome of a raw SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutcome {
    /// A row-returning statement and its rows
    Rows(Rows),
    /// A statement that was executed and committed
    Executed { changes: usize },
}

/// A database found in the storage directory.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseEntry {
    /// Name without the `.db` suffix
    pub name: String,
    /// File name with suffix
    pub file: String,
    /// Full path of the file
    pub path: PathBuf,
    /// Stored metadata; `None` if absent or unreadable
    pub metadata: Option<Metadata>,
}

/// Render a value the way it is shown to users.
///
/// NULL renders as `NULL`, blobs as their size.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_owned(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}
