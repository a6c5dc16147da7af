// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! Database handles and per-call connection management.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::schema::METADATA_SCHEMA_SQL;

/// File suffix of every database in the storage directory.
pub const DB_SUFFIX: &str = ".db";

/// Database open mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only access (listing and inspection)
    ReadOnly,
    /// Read-write access to an existing file
    ReadWrite,
    /// Create the file if it doesn't exist
    Create,
}

/// Handle to one database file.
///
/// The handle holds no connection. Every operation opens its own
/// connection and drops it before returning, so nothing stays locked
/// between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    path: PathBuf,
    file_name: String,
}

/// Normalize a user-supplied database name into a file name.
///
/// Surrounding whitespace is removed and the `.db` suffix appended when
/// missing.
pub fn sanitize_file_name(name: &str) -> String {
    let name = name.trim();
    if name.ends_with(DB_SUFFIX) {
        name.to_owned()
    } else {
        format!("{name}{DB_SUFFIX}")
    }
}

impl Database {
    /// Handle for database `name` inside `dir`. Nothing is touched on disk.
    pub fn new<P: AsRef<Path>>(dir: P, name: &str) -> Self {
        let file_name = sanitize_file_name(name);
        Self {
            path: dir.as_ref().join(&file_name),
            file_name,
        }
    }

    /// Full path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name including the `.db` suffix.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Database name without the suffix.
    pub fn name(&self) -> &str {
        self.file_name
            .strip_suffix(DB_SUFFIX)
            .unwrap_or(&self.file_name)
    }

    /// Whether the database file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Open a connection scoped to a single call.
    pub(crate) fn connect(&self, mode: OpenMode) -> Result<Connection> {
        let path = self.path.as_path();
        let flags = match mode {
            OpenMode::ReadOnly => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path.to_owned()));
                }
                OpenFlags::SQLITE_OPEN_READ_ONLY
            }
            OpenMode::ReadWrite => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path.to_owned()));
                }
                OpenFlags::SQLITE_OPEN_READ_WRITE
            }
            OpenMode::Create => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| {
                        Error::io(
                            format!("Failed to create storage directory {}", parent.display()),
                            e,
                        )
                    })?;
                }
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
            }
        };

        let conn = Connection::open_with_flags(path, flags).map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;

        if mode != OpenMode::ReadOnly {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        }

        debug!("Opened database at {} ({:?})", path.display(), mode);
        Ok(conn)
    }

    /// Make sure the file and the metadata table exist.
    ///
    /// When the file did not exist before and `metadata` is given, it is
    /// stored right away. Returns whether the file was newly created.
    pub fn open_or_create(&self, metadata: Option<&Metadata>) -> Result<bool> {
        let is_new = !self.exists();

        {
            let conn = self.connect(OpenMode::Create)?;
            conn.execute_batch(METADATA_SCHEMA_SQL)?;
        }

        if is_new {
            info!("Created database {}", self.path.display());
            if let Some(metadata) = metadata {
                self.save_metadata(metadata)?;
            }
        }
        Ok(is_new)
    }
}
