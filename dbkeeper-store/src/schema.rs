// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! Table-level operations: name validation, creation and introspection.

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::connection::{Database, OpenMode};
use crate::error::{Error, Result};
use crate::types::ColumnInfo;

/// Name of the reserved metadata table.
pub const METADATA_TABLE: &str = "_database_metadata";

/// Schema of the reserved metadata table.
pub const METADATA_SCHEMA_SQL: &str = r#"
create table if not exists _database_metadata (
    key   text primary key,
    value text
);
"#;

/// Keywords that cannot be used as table names (compared case-insensitively).
pub const RESERVED_WORDS: &[&str] = &[
    "select",
    "from",
    "where",
    "insert",
    "update",
    "delete",
    "create",
    "drop",
    "alter",
    "table",
    "index",
    "view",
    "database",
    "schema",
    "primary",
    "foreign",
    "key",
    "constraint",
    "unique",
    "null",
    "not",
    "and",
    "or",
];

/// Check a table name against the naming rules.
pub fn validate_table_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| -> Result<()> {
        Err(Error::InvalidTableName {
            name: name.to_owned(),
            reason: reason.to_owned(),
        })
    };

    if name.is_empty() {
        return invalid("table name cannot be empty");
    }
    if RESERVED_WORDS.iter().any(|w| w.eq_ignore_ascii_case(name)) {
        return invalid("it is a reserved SQL keyword");
    }
    if name == METADATA_TABLE {
        return invalid("it is reserved for database metadata");
    }
    if name.starts_with('_') {
        return invalid("names starting with an underscore are reserved for system use");
    }

    let mut chars = name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_with_letter || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return invalid(
            "must start with a letter and contain only letters, numbers and underscores",
        );
    }
    Ok(())
}

/// Quote an identifier for use in generated SQL.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn table_exists_on(conn: &Connection, table: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            params![table],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

impl Database {
    /// Check if a table exists.
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let conn = self.connect(OpenMode::ReadOnly)?;
        table_exists_on(&conn, table)
    }

    /// List user tables, ordered by name.
    ///
    /// The metadata table and SQLite's internal tables are never included.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let conn = self.connect(OpenMode::ReadOnly)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name != ?1 AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#,
        )?;

        let mut tables = Vec::new();
        let mut rows = stmt.query(params![METADATA_TABLE])?;
        while let Some(row) = rows.next()? {
            tables.push(row.get(0)?);
        }
        Ok(tables)
    }

    /// Describe the columns of a table.
    ///
    /// Returns `None` if the table does not exist.
    pub fn get_schema(&self, table: &str) -> Result<Option<Vec<ColumnInfo>>> {
        let conn = self.connect(OpenMode::ReadOnly)?;
        if !table_exists_on(&conn, table)? {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT cid, name, type, "notnull", dflt_value, pk
            FROM pragma_table_info(?1)
            ORDER BY cid
            "#,
        )?;

        let mut columns = Vec::new();
        let mut rows = stmt.query(params![table])?;
        while let Some(row) = rows.next()? {
            columns.push(ColumnInfo {
                cid: row.get(0)?,
                name: row.get(1)?,
                declared_type: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
                default_value: row.get(4)?,
                primary_key: row.get::<_, i64>(5)? != 0,
            });
        }
        Ok(Some(columns))
    }

    /// Column names of a table, in declaration order.
    ///
    /// Empty if the table does not exist.
    pub fn column_names(&self, table: &str) -> Result<Vec<String>> {
        Ok(self
            .get_schema(table)?
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    /// Create a table after validating its name.
    ///
    /// `columns` is a raw fragment (e.g. `id INTEGER PRIMARY KEY, name TEXT`)
    /// placed verbatim between the parentheses of the CREATE TABLE
    /// statement; only the engine checks it.
    pub fn create_table(&self, table: &str, columns: &str) -> Result<()> {
        validate_table_name(table)?;

        let conn = self.connect(OpenMode::ReadWrite)?;
        if table_exists_on(&conn, table)? {
            return Err(Error::TableExists(table.to_owned()));
        }

        let sql = format!("CREATE TABLE {table} ({columns})");
        debug!("{sql}");
        conn.execute(&sql, [])
            .map_err(|source| Error::CreateTable {
                table: table.to_owned(),
                source,
            })?;

        info!("Created table {table} in {}", self.file_name());
        Ok(())
    }
}
