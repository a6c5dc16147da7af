// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! Read query operations.
//!
//! `columns`, `condition` and raw SQL arguments are raw fragments: they are
//! placed into the statement text unescaped, so they must come from a
//! trusted source. Table names are quoted as identifiers.

use rusqlite::Connection;
use tracing::debug;

use crate::connection::{Database, OpenMode};
use crate::error::Result;
use crate::schema::quote_ident;
use crate::types::{RawOutcome, Rows, Value};

/// Leading keywords of statements treated as row-returning by [`Database::execute_raw`].
const ROW_RETURNING: &[&str] = &["SELECT", "WITH", "PRAGMA", "EXPLAIN", "VALUES"];

/// ` WHERE <condition>`, or nothing for a blank condition.
pub(crate) fn where_clause(condition: &str) -> String {
    let condition = condition.trim();
    if condition.is_empty() {
        String::new()
    } else {
        format!(" WHERE {condition}")
    }
}

/// `sql` without leading whitespace and `--` or `/* */` comments.
fn skip_leading_comments(mut sql: &str) -> &str {
    loop {
        sql = sql.trim_start();
        if let Some(rest) = sql.strip_prefix("--") {
            sql = rest.split_once('\n').map_or("", |(_, after)| after);
        } else if let Some(rest) = sql.strip_prefix("/*") {
            sql = rest.split_once("*/").map_or("", |(_, after)| after);
        } else {
            return sql;
        }
    }
}

fn returns_rows(sql: &str) -> bool {
    let first = skip_leading_comments(sql)
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    ROW_RETURNING.iter().any(|k| k.eq_ignore_ascii_case(first))
}

fn fetch_rows(conn: &Connection, sql: &str) -> Result<Rows> {
    debug!("{sql}");
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_owned).collect();
    let width = columns.len();

    let mut result = Rows {
        columns,
        rows: Vec::new(),
    };
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            values.push(row.get::<_, Value>(i)?);
        }
        result.rows.push(values);
    }
    Ok(result)
}

impl Database {
    /// `SELECT <columns> FROM <table> [WHERE <condition>]`.
    pub fn select(&self, table: &str, columns: &str, condition: &str) -> Result<Rows> {
        let conn = self.connect(OpenMode::ReadOnly)?;
        let sql = format!(
            "SELECT {columns} FROM {}{}",
            quote_ident(table),
            where_clause(condition)
        );
        fetch_rows(&conn, &sql)
    }

    /// Every row of a table.
    pub fn select_all(&self, table: &str) -> Result<Rows> {
        self.select(table, "*", "")
    }

    /// `SELECT DISTINCT <columns> FROM <table> [WHERE <condition>]`.
    pub fn select_distinct(&self, table: &str, columns: &str, condition: &str) -> Result<Rows> {
        let conn = self.connect(OpenMode::ReadOnly)?;
        let sql = format!(
            "SELECT DISTINCT {columns} FROM {}{}",
            quote_ident(table),
            where_clause(condition)
        );
        fetch_rows(&conn, &sql)
    }

    /// Number of rows matching `condition`.
    pub fn count(&self, table: &str, condition: &str) -> Result<i64> {
        let conn = self.connect(OpenMode::ReadOnly)?;
        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            quote_ident(table),
            where_clause(condition)
        );
        debug!("{sql}");
        Ok(conn.query_row(&sql, [], |row| row.get(0))?)
    }

    /// `SUM(<column>)` over rows matching `condition`.
    ///
    /// NULL when no row matches, as in SQL.
    pub fn sum(&self, table: &str, column: &str, condition: &str) -> Result<Value> {
        let conn = self.connect(OpenMode::ReadOnly)?;
        let sql = format!(
            "SELECT SUM({column}) FROM {}{}",
            quote_ident(table),
            where_clause(condition)
        );
        debug!("{sql}");
        Ok(conn.query_row(&sql, [], |row| row.get(0))?)
    }

    /// First `limit` rows of a table.
    pub fn get_page(&self, table: &str, limit: usize) -> Result<Rows> {
        let conn = self.connect(OpenMode::ReadOnly)?;
        let sql = format!("SELECT * FROM {} LIMIT {limit}", quote_ident(table));
        fetch_rows(&conn, &sql)
    }

    /// Run arbitrary SQL.
    ///
    /// Statements starting with SELECT (or WITH, PRAGMA, EXPLAIN, VALUES) return
    /// their rows; anything else is executed and committed, returning the
    /// number of changed rows.
    pub fn execute_raw(&self, sql: &str) -> Result<RawOutcome> {
        let conn = self.connect(OpenMode::ReadWrite)?;
        let sql = sql.trim();
        if returns_rows(sql) {
            return Ok(RawOutcome::Rows(fetch_rows(&conn, sql)?));
        }

        debug!("{sql}");
        let changes = conn.execute(sql, [])?;
        Ok(RawOutcome::Executed { changes })
    }
}
