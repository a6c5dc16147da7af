// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! Error types for database operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during database operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to open database with context
    #[error("Failed to open database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database file not found
    #[error("Database not found at: {0}")]
    DatabaseNotFound(PathBuf),

    /// Table name rejected before reaching the engine
    #[error("Invalid table name '{name}': {reason}")]
    InvalidTableName { name: String, reason: String },

    /// Table already present in the database
    #[error("Table '{0}' already exists")]
    TableExists(String),

    /// The engine rejected a CREATE TABLE statement
    #[error("Failed to create table '{table}': {source}")]
    CreateTable {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Insert called without any column values
    #[error("Nothing to insert into '{table}': no column values given")]
    EmptyRecord { table: String },

    /// UPDATE or DELETE called without a WHERE condition
    #[error("{statement} on '{table}' requires a condition")]
    EmptyCondition {
        statement: &'static str,
        table: String,
    },

    /// Filesystem error with context
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the error was raised by validation, before any SQL ran.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidTableName { .. }
                | Self::TableExists(_)
                | Self::EmptyRecord { .. }
                | Self::EmptyCondition { .. }
        )
    }
}
