// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! Key-value metadata stored alongside each database.
//!
//! Metadata lives in the reserved `_database_metadata` table, one row per
//! key. List values are stored comma-joined; on read only the `tags` key is
//! split back into a list.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::connection::{Database, OpenMode};
use crate::error::Result;
use crate::schema::{METADATA_SCHEMA_SQL, METADATA_TABLE};

/// Well-known metadata keys.
pub mod keys {
    pub const CREATED_DATE: &str = "created_date";
    pub const LAST_MODIFIED: &str = "last_modified";
    pub const DATABASE_NAME: &str = "database_name";
    pub const DESCRIPTION: &str = "description";
    pub const PURPOSE: &str = "purpose";
    pub const OWNER: &str = "owner";
    pub const TAGS: &str = "tags";
}

/// Current local time as stored in `created_date` and `last_modified`.
///
/// Fixed-width ISO-8601 with microseconds, so string order is time order.
pub fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    Text(String),
    List(Vec<String>),
}

impl MetaValue {
    /// Form written to the metadata table.
    fn stored(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(","),
        }
    }

    /// Decode a stored value; `tags` becomes a list of trimmed, non-empty items.
    fn decode(key: &str, value: String) -> Self {
        if key == keys::TAGS && !value.is_empty() {
            Self::List(split_list(&value))
        } else {
            Self::Text(value)
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Split a comma-separated list into trimmed, non-empty items.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Metadata record of one database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: BTreeMap<String, MetaValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<MetaValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<MetaValue>) -> Option<MetaValue> {
        self.entries.insert(key.to_owned(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    /// Text value of `key`; lists are not returned here.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(MetaValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// The `tags` list, empty if unset.
    pub fn tags(&self) -> &[String] {
        match self.entries.get(keys::TAGS) {
            Some(MetaValue::List(items)) => items,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, MetaValue> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a String, &'a MetaValue);
    type IntoIter = btree_map::Iter<'a, String, MetaValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Database {
    /// Store metadata, adding `created_date`, `last_modified` and `database_name`.
    ///
    /// Caller keys override the automatic ones, except that an existing
    /// `created_date` is kept and `last_modified` is always the current time.
    pub fn save_metadata(&self, metadata: &Metadata) -> Result<()> {
        let now = timestamp();
        let mut record = Metadata::new().with(keys::DATABASE_NAME, self.file_name());
        for (key, value) in metadata {
            record.insert(key, value.clone());
        }
        let created = record
            .remove(keys::CREATED_DATE)
            .unwrap_or_else(|| MetaValue::from(now.as_str()));
        record.insert(keys::LAST_MODIFIED, now);

        let defaults = Metadata::new().with(keys::CREATED_DATE, created);
        self.write_metadata(&defaults, &record)
    }

    /// Merge `changes` into the stored metadata and refresh `last_modified`.
    ///
    /// `created_date` is never rewritten by an update. A database that had
    /// no metadata yet also gets `created_date` and `database_name`.
    pub fn update_metadata(&self, changes: &Metadata) -> Result<()> {
        let mut record = changes.clone();
        if record.remove(keys::CREATED_DATE).is_some() {
            debug!("Ignoring created_date in metadata update");
        }
        let now = timestamp();
        record.insert(keys::LAST_MODIFIED, now.as_str());

        let mut defaults = Metadata::new().with(keys::CREATED_DATE, now);
        if record.get(keys::DATABASE_NAME).is_none() {
            defaults.insert(keys::DATABASE_NAME, self.file_name());
        }
        self.write_metadata(&defaults, &record)
    }

    /// Write `record` over existing keys; `defaults` only fill keys not stored yet.
    fn write_metadata(&self, defaults: &Metadata, record: &Metadata) -> Result<()> {
        let mut conn = self.connect(OpenMode::Create)?;
        conn.execute_batch(METADATA_SCHEMA_SQL)?;

        let tx = conn.transaction()?;
        {
            let mut keep_existing = tx.prepare(
                "INSERT OR IGNORE INTO _database_metadata (key, value) VALUES (?1, ?2)",
            )?;
            for (key, value) in defaults {
                keep_existing.execute(params![key, value.stored()])?;
            }
            let mut upsert = tx.prepare(
                "INSERT OR REPLACE INTO _database_metadata (key, value) VALUES (?1, ?2)",
            )?;
            for (key, value) in record {
                upsert.execute(params![key, value.stored()])?;
            }
        }
        tx.commit()?;

        debug!(
            "Wrote {} metadata keys to {}",
            defaults.len() + record.len(),
            self.file_name()
        );
        Ok(())
    }

    /// Read the stored metadata.
    ///
    /// Returns `None` if the file or the metadata table is missing, or the
    /// table holds no rows.
    pub fn get_metadata(&self) -> Result<Option<Metadata>> {
        if !self.exists() {
            return Ok(None);
        }
        let conn = self.connect(OpenMode::ReadOnly)?;

        let has_table = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
                params![METADATA_TABLE],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !has_table {
            return Ok(None);
        }

        let mut stmt = conn.prepare("SELECT key, value FROM _database_metadata ORDER BY key")?;
        let mut metadata = Metadata::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let value: Option<String> = row.get(1)?;
            let value = MetaValue::decode(&key, value.unwrap_or_default());
            metadata.insert(&key, value);
        }

        if metadata.is_empty() {
            Ok(None)
        } else {
            Ok(Some(metadata))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_empty() {
        assert_eq!(split_list(" a, b ,,c ,"), vec!["a", "b", "c"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn only_tags_decode_as_list() {
        assert_eq!(
            MetaValue::decode("tags", "x, y".into()),
            MetaValue::List(vec!["x".into(), "y".into()])
        );
        assert_eq!(
            MetaValue::decode("owner", "x, y".into()),
            MetaValue::Text("x, y".into())
        );
        assert_eq!(MetaValue::decode("tags", String::new()), MetaValue::Text(String::new()));
    }

    #[test]
    fn list_is_stored_comma_joined() {
        let value = MetaValue::from(vec!["demo".to_owned(), "beginner".to_owned()]);
        assert_eq!(value.stored(), "demo,beginner");
        assert_eq!(value.to_string(), "demo, beginner");
    }

    #[test]
    fn timestamp_is_fixed_width() {
        let ts = timestamp();
        assert_eq!(ts.len(), "2025-01-01T00:00:00.000000".len());
        assert_eq!(&ts[10..11], "T");
    }
}
