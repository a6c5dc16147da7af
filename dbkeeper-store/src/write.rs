// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! Write operations on user tables.
//!
//! Inserted values are bound as parameters. `set_clause` and `condition`
//! are raw fragments placed into the statement text unescaped.

use rusqlite::params_from_iter;
use tracing::debug;

use crate::connection::{Database, OpenMode};
use crate::error::{Error, Result};
use crate::query::where_clause;
use crate::schema::quote_ident;
use crate::types::Record;

impl Database {
    /// Insert one row from a column-to-value map.
    ///
    /// Returns the rowid of the new row. An empty record is rejected
    /// without touching the database.
    pub fn insert(&self, table: &str, record: &Record) -> Result<i64> {
        if record.is_empty() {
            return Err(Error::EmptyRecord {
                table: table.to_owned(),
            });
        }

        let columns = record
            .keys()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=record.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({columns}) VALUES ({placeholders})",
            quote_ident(table)
        );

        let conn = self.connect(OpenMode::ReadWrite)?;
        debug!("{sql}");
        conn.execute(&sql, params_from_iter(record.values()))?;
        Ok(conn.last_insert_rowid())
    }

    /// `UPDATE <table> SET <set_clause> WHERE <condition>`.
    ///
    /// Returns the number of updated rows.
    pub fn update(&self, table: &str, set_clause: &str, condition: &str) -> Result<usize> {
        if condition.trim().is_empty() {
            return Err(Error::EmptyCondition {
                statement: "UPDATE",
                table: table.to_owned(),
            });
        }

        let conn = self.connect(OpenMode::ReadWrite)?;
        let sql = format!(
            "UPDATE {} SET {set_clause}{}",
            quote_ident(table),
            where_clause(condition)
        );
        debug!("{sql}");
        Ok(conn.execute(&sql, [])?)
    }

    /// `DELETE FROM <table> WHERE <condition>`.
    ///
    /// Returns the number of deleted rows.
    pub fn delete(&self, table: &str, condition: &str) -> Result<usize> {
        if condition.trim().is_empty() {
            return Err(Error::EmptyCondition {
                statement: "DELETE",
                table: table.to_owned(),
            });
        }

        let conn = self.connect(OpenMode::ReadWrite)?;
        let sql = format!(
            "DELETE FROM {}{}",
            quote_ident(table),
            where_clause(condition)
        );
        debug!("{sql}");
        Ok(conn.execute(&sql, [])?)
    }
}
