// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! The storage directory holding every database file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::connection::{DB_SUFFIX, Database};
use crate::error::{Error, Result};
use crate::types::DatabaseEntry;

/// Default storage directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Directory of `.db` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    dir: PathBuf,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl Catalog {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Handle for the database called `name` in this directory.
    pub fn database(&self, name: &str) -> Database {
        Database::new(&self.dir, name)
    }

    /// Every database in the directory with its metadata, sorted by name.
    ///
    /// A database whose metadata cannot be read is still listed, with
    /// `metadata: None`. A missing directory lists nothing.
    pub fn list_all_databases(&self) -> Result<Vec<DatabaseEntry>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::io(
                    format!("Failed to list {}", self.dir.display()),
                    e,
                ));
            }
        };

        let mut files = Vec::new();
        for entry in read_dir {
            let entry =
                entry.map_err(|e| Error::io(format!("Failed to list {}", self.dir.display()), e))?;
            let file = entry.file_name().to_string_lossy().into_owned();
            if file.ends_with(DB_SUFFIX) && entry.path().is_file() {
                files.push(file);
            }
        }
        files.sort();

        let databases = files
            .into_iter()
            .map(|file| {
                let db = self.database(&file);
                let metadata = match db.get_metadata() {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        warn!("Could not read metadata of {}: {e}", db.path().display());
                        None
                    }
                };
                DatabaseEntry {
                    name: db.name().to_owned(),
                    file,
                    path: db.path().to_owned(),
                    metadata,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "Found {} databases in {}",
            databases.len(),
            self.dir.display()
        );
        Ok(databases)
    }
}
