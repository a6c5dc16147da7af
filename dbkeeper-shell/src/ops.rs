// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! Operations shared by both menus.
//!
//! Each operation takes the [`Vocabulary`] of the menu that runs it. Store
//! errors are printed and end only the current operation.

use std::io::{BufRead, Write};

use dbkeeper_store::metadata::{keys, split_list};
use dbkeeper_store::{
    Database, MetaValue, Metadata, RawOutcome, Record, Value, display_value, validate_table_name,
};

use crate::console::Console;
use crate::error::Result;
use crate::forms::{ColumnSpec, ColumnType, columns_clause, parse_pair};
use crate::menu::Shell;
use crate::render::{metadata_lines, numbered, rows_table, schema_table};
use crate::vocabulary::{TECHNICAL, Vocabulary, capitalize};

const INFO_RULE: &str = "==================================================";

/// Print a store error as `Error <action>: <message>`.
///
/// Returns `None` when the operation failed and the caller should stop.
pub(crate) fn report<R: BufRead, W: Write, T>(
    console: &mut Console<R, W>,
    action: &str,
    result: dbkeeper_store::Result<T>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            console.say(format!("Error {action}: {e}"))?;
            Ok(None)
        }
    }
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// The open database, or a notice when there is none.
    pub(crate) fn require_db(&mut self) -> Result<Option<Database>> {
        match self.session.current() {
            Some(db) => Ok(Some(db.clone())),
            None => {
                self.console
                    .say("No database opened. Please open a database first.")?;
                Ok(None)
            }
        }
    }

    /// Ask for a table name and check that it exists.
    ///
    /// Unknown names are reported together with the tables that do exist.
    pub(crate) fn pick_table(
        &mut self,
        db: &Database,
        vocab: &Vocabulary,
    ) -> Result<Option<String>> {
        let name = self.console.prompt(&format!("Enter {} name: ", vocab.table))?;
        if name.is_empty() {
            self.console
                .say(format!("{} name cannot be empty.", capitalize(vocab.table)))?;
            return Ok(None);
        }

        let action = format!("looking up {}", vocab.table);
        match report(&mut self.console, &action, db.table_exists(&name))? {
            Some(true) => return Ok(Some(name)),
            Some(false) => {}
            None => return Ok(None),
        }

        self.console
            .say(format!("{} '{name}' not found.", capitalize(vocab.table)))?;
        let action = format!("listing {}", vocab.tables);
        if let Some(tables) = report(&mut self.console, &action, db.list_tables())? {
            if tables.is_empty() {
                self.console
                    .say(format!("No {} exist in this database yet.", vocab.tables))?;
            } else {
                self.console
                    .say(format!("Available {}:", vocab.tables))?;
                for line in numbered(&tables, "  ") {
                    self.console.say(line)?;
                }
            }
        }
        Ok(None)
    }

    pub(crate) fn open_database(&mut self) -> Result<()> {
        self.console.say("")?;
        self.console.say("Database Options:")?;
        self.console.say("1. Create new database")?;
        self.console.say("2. Open existing database")?;
        match self.console.prompt("Enter choice (1-2): ")?.as_str() {
            "1" => self.create_database(),
            "2" => self.open_existing_database(),
            _ => self.console.say("Invalid choice."),
        }
    }

    fn create_database(&mut self) -> Result<()> {
        let name = self
            .console
            .prompt("Enter database name (without .db extension): ")?;
        if name.is_empty() {
            return self.console.say("Database name cannot be empty.");
        }
        if name.contains(['/', '\\']) {
            return self
                .console
                .say("Database name cannot contain path separators.");
        }

        let db = self.session.catalog().database(&name);
        if db.exists() {
            self.console
                .say(format!("Database '{}' already exists, opening it.", db.name()))?;
            if report(&mut self.console, "opening database", db.open_or_create(None))?.is_some() {
                self.session.open(db);
            }
            return Ok(());
        }

        self.console.say("")?;
        self.console.say("Database Metadata:")?;
        let mut metadata = Metadata::new();
        for (key, label) in [
            (keys::DESCRIPTION, "Description: "),
            (keys::PURPOSE, "Purpose/Project: "),
            (keys::OWNER, "Owner/Creator: "),
        ] {
            let value = self.console.prompt(label)?;
            if !value.is_empty() {
                metadata.insert(key, value);
            }
        }
        let tags = split_list(&self.console.prompt("Tags (comma-separated): ")?);
        if !tags.is_empty() {
            metadata.insert(keys::TAGS, tags);
        }

        let created = db.open_or_create(Some(&metadata));
        if report(&mut self.console, "creating database", created)?.is_some() {
            self.console
                .say(format!("Successfully created database: {}", db.name()))?;
            self.session.open(db);
        }
        Ok(())
    }

    fn open_existing_database(&mut self) -> Result<()> {
        let listing = self.session.catalog().list_all_databases();
        let Some(entries) = report(&mut self.console, "listing databases", listing)? else {
            return Ok(());
        };
        if entries.is_empty() {
            return self.console.say("No databases found in data directory.");
        }

        self.console.say("")?;
        self.console.say("Available databases:")?;
        for (i, entry) in entries.iter().enumerate() {
            let description = entry
                .metadata
                .as_ref()
                .and_then(|m| m.text(keys::DESCRIPTION))
                .unwrap_or("No description");
            self.console
                .say(format!("{}. {} - {description}", i + 1, entry.name))?;
        }

        let Some(choice) = self.console.prompt_number("Enter database number: ")? else {
            return self.console.say("Invalid input. Please enter a number.");
        };
        let Some(entry) = choice.checked_sub(1).and_then(|i| entries.get(i)) else {
            return self.console.say("Invalid selection.");
        };

        let db = self.session.catalog().database(&entry.name);
        if report(&mut self.console, "opening database", db.open_or_create(None))?.is_some() {
            self.console
                .say(format!("Successfully opened database: {}", db.name()))?;
            self.session.open(db);
        }
        Ok(())
    }

    pub(crate) fn list_databases(&mut self) -> Result<()> {
        let listing = self.session.catalog().list_all_databases();
        let Some(entries) = report(&mut self.console, "listing databases", listing)? else {
            return Ok(());
        };
        if entries.is_empty() {
            return self.console.say("No databases found in data directory.");
        }

        self.console.say("")?;
        self.console.say(INFO_RULE)?;
        self.console.say("                 ALL DATABASES")?;
        self.console.say(INFO_RULE)?;
        for entry in &entries {
            self.console.say("")?;
            self.console.say(format!("Database: {}", entry.name))?;
            self.console.say(format!("File: {}", entry.file))?;
            match &entry.metadata {
                Some(metadata) => {
                    for line in metadata_lines(metadata) {
                        self.console.say(line)?;
                    }
                }
                None => self.console.say("No metadata available")?,
            }
            self.console.say("----------------------------------------")?;
        }
        Ok(())
    }

    pub(crate) fn list_tables(&mut self, vocab: &Vocabulary) -> Result<()> {
        let Some(db) = self.require_db()? else {
            return Ok(());
        };
        let action = format!("listing {}", vocab.tables);
        let Some(tables) = report(&mut self.console, &action, db.list_tables())? else {
            return Ok(());
        };
        if tables.is_empty() {
            return self
                .console
                .say(format!("No {} found in database.", vocab.tables));
        }
        self.console.say("")?;
        self.console
            .say(format!("{} in database:", capitalize(vocab.tables)))?;
        for line in numbered(&tables, "") {
            self.console.say(line)?;
        }
        Ok(())
    }

    pub(crate) fn create_table(&mut self) -> Result<()> {
        let Some(db) = self.require_db()? else {
            return Ok(());
        };
        self.console.say("")?;
        self.console.say("Table Creation Options:")?;
        self.console.say("1. Interactive table creation (guided)")?;
        self.console.say("2. Manual SQL definition")?;
        match self.console.prompt("Enter choice (1-2): ")?.as_str() {
            "1" => self.create_table_guided(&db, &TECHNICAL),
            "2" => self.create_table_manual(&db),
            _ => self.console.say("Invalid choice."),
        }
    }

    fn prompt_new_table_name(&mut self, vocab: &Vocabulary) -> Result<Option<String>> {
        let name = self.console.prompt(&format!("Enter {} name: ", vocab.table))?;
        if name.is_empty() {
            self.console
                .say(format!("{} name cannot be empty.", capitalize(vocab.table)))?;
            return Ok(None);
        }
        let action = format!("creating {}", vocab.table);
        Ok(report(&mut self.console, &action, validate_table_name(&name))?.map(|()| name))
    }

    fn prompt_column(&mut self, number: usize, vocab: &Vocabulary) -> Result<Option<ColumnSpec>> {
        let column = capitalize(vocab.column);
        self.console.say("")?;
        self.console.say(format!("{column} {number}:"))?;
        let name = self
            .console
            .prompt(&format!("  {column} name (or Enter to finish): "))?;
        if name.is_empty() {
            return Ok(None);
        }

        let typed = self.console.prompt("  Data type (INTEGER/TEXT/REAL/BLOB): ")?;
        let column_type = match ColumnType::parse(&typed) {
            Some(t) => t,
            None => {
                self.console.say(format!(
                    "  Invalid data type '{typed}'. Using TEXT as default."
                ))?;
                self.console.say(
                    "  Valid types: INTEGER (or INT), TEXT (or STRING), REAL (or FLOAT), BLOB",
                )?;
                ColumnType::Text
            }
        };

        let mut spec = ColumnSpec::new(&name, column_type);
        if !vocab.auto_id && self.console.confirm("  Primary key?")? {
            spec.primary_key = true;
            if column_type == ColumnType::Integer {
                spec.autoincrement = self.console.confirm("  Auto increment?")?;
            }
        }
        spec.not_null = self.console.confirm("  Not null?")?;
        spec.unique = self.console.confirm("  Unique?")?;
        let default = self
            .console
            .prompt("  Default value (or Enter for none): ")?;
        if !default.is_empty() {
            spec.default = Some(default);
        }

        self.console.say(format!("  Added: {}", spec.to_sql()))?;
        Ok(Some(spec))
    }

    /// Column-by-column table creation.
    pub(crate) fn create_table_guided(&mut self, db: &Database, vocab: &Vocabulary) -> Result<()> {
        let Some(name) = self.prompt_new_table_name(vocab)? else {
            return Ok(());
        };

        self.console.say("")?;
        self.console
            .say(format!("Defining {} for {} '{name}':", vocab.columns, vocab.table))?;
        self.console.say(format!(
            "Enter {} definitions (press Enter on empty name to finish)",
            vocab.column
        ))?;
        if vocab.friendly_types {
            self.console.say(
                "Available types: Numbers (INTEGER), Text/Words (TEXT), \
                 Decimal Numbers (REAL), Files/Binary (BLOB)",
            )?;
        } else {
            self.console.say("Available types: INTEGER, TEXT, REAL, BLOB")?;
            self.console
                .say("Constraints: PRIMARY KEY, NOT NULL, UNIQUE, DEFAULT value")?;
        }

        let mut columns = Vec::new();
        if vocab.auto_id {
            columns.push(ColumnSpec::auto_id());
            self.console.say(format!(
                "An automatic 'id' {} will number each {}.",
                vocab.column, vocab.row
            ))?;
        }
        let preset = columns.len();

        while let Some(spec) = self.prompt_column(columns.len() - preset + 1, vocab)? {
            columns.push(spec);
        }
        if columns.len() == preset {
            return self.console.say(format!(
                "No {} defined. {} creation cancelled.",
                vocab.columns,
                capitalize(vocab.table)
            ));
        }

        self.confirm_create(db, &name, &columns_clause(&columns), vocab)
    }

    fn create_table_manual(&mut self, db: &Database) -> Result<()> {
        let Some(name) = self.prompt_new_table_name(&TECHNICAL)? else {
            return Ok(());
        };

        self.console.say("")?;
        self.console
            .say(format!("Enter column definitions for table '{name}':"))?;
        self.console
            .say("Example: id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER")?;
        self.console.say("Press Enter twice when finished:")?;
        let columns = self.console.read_block(true)?.join(" ");

        self.confirm_create(db, &name, &columns, &TECHNICAL)
    }

    fn confirm_create(
        &mut self,
        db: &Database,
        name: &str,
        columns: &str,
        vocab: &Vocabulary,
    ) -> Result<()> {
        let label = capitalize(vocab.table);
        self.console.say("")?;
        self.console.say(format!("Final {} definition:", vocab.table))?;
        self.console.say(format!("CREATE TABLE {name} ({columns})"))?;

        if !self.console.confirm(&format!("Create this {}?", vocab.table))? {
            return self.console.say(format!("{label} creation cancelled."));
        }
        let action = format!("creating {}", vocab.table);
        if report(&mut self.console, &action, db.create_table(name, columns))?.is_some() {
            self.console
                .say(format!("{label} '{name}' created successfully!"))?;
        }
        Ok(())
    }

    pub(crate) fn show_schema(&mut self, vocab: &Vocabulary) -> Result<()> {
        let Some(db) = self.require_db()? else {
            return Ok(());
        };
        let Some(table) = self.pick_table(&db, vocab)? else {
            return Ok(());
        };
        let action = format!("reading {} schema", vocab.table);
        match report(&mut self.console, &action, db.get_schema(&table))? {
            Some(Some(columns)) => {
                self.console.say("")?;
                self.console
                    .say(format!("{} in {} '{table}':", capitalize(vocab.columns), vocab.table))?;
                self.console.say(schema_table(&columns, vocab))
            }
            Some(None) => self
                .console
                .say(format!("{} '{table}' not found.", capitalize(vocab.table))),
            None => Ok(()),
        }
    }

    /// Row entry as repeated `column=value` lines.
    pub(crate) fn insert_pairs(&mut self) -> Result<()> {
        let Some(db) = self.require_db()? else {
            return Ok(());
        };
        let Some(table) = self.pick_table(&db, &TECHNICAL)? else {
            return Ok(());
        };

        if let Some(columns) = report(&mut self.console, "reading columns", db.column_names(&table))? {
            self.console.say(format!("Columns: {}", columns.join(", ")))?;
        }
        self.console.say(
            "Enter column=value pairs (one per line, press Enter on empty line to finish):",
        )?;
        self.console
            .say("Example: name=John Doe, age=25, email=john@example.com")?;

        let mut record = Record::new();
        loop {
            let line = self.console.read_line()?;
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            let Some((column, value)) = parse_pair(line) else {
                self.console.say("Invalid format. Use: column=value")?;
                continue;
            };
            if record.contains_key(&column) {
                self.console.say(format!(
                    "Warning: Column '{column}' already specified. Overwriting previous value."
                ))?;
            }
            self.console.say(format!("  Added: {column} = {value}"))?;
            record.insert(column, Value::Text(value));
        }

        if record.is_empty() {
            return self.console.say("No data to insert.");
        }
        if let Some(id) = report(&mut self.console, "inserting data", db.insert(&table, &record))? {
            self.console
                .say(format!("Data inserted successfully (row id {id})."))?;
        }
        Ok(())
    }

    pub(crate) fn view_rows(&mut self, vocab: &Vocabulary) -> Result<()> {
        let Some(db) = self.require_db()? else {
            return Ok(());
        };
        let Some(table) = self.pick_table(&db, vocab)? else {
            return Ok(());
        };

        let page_size = self.session.page_size();
        let answer = self.console.prompt(&format!(
            "Enter number of {} to display (default: {page_size}): ",
            vocab.rows
        ))?;
        let limit = if answer.is_empty() {
            page_size
        } else if let Ok(n) = answer.parse::<usize>() {
            n
        } else {
            self.console.say(format!(
                "Invalid number. Showing up to {page_size} {}.",
                vocab.rows
            ))?;
            page_size
        };

        let action = format!("viewing {} data", vocab.table);
        let Some(rows) = report(&mut self.console, &action, db.get_page(&table, limit))? else {
            return Ok(());
        };
        if rows.is_empty() {
            return self
                .console
                .say(format!("No {} found in {} '{table}'.", vocab.rows, vocab.table));
        }
        self.console.say("")?;
        self.console.say(format!(
            "First {} {} from {} '{table}':",
            rows.len(),
            vocab.rows,
            vocab.table
        ))?;
        self.console.say(rows_table(&rows))
    }

    pub(crate) fn execute_sql(&mut self) -> Result<()> {
        let Some(db) = self.require_db()? else {
            return Ok(());
        };
        self.console
            .say("Enter SQL query (press Enter twice to execute):")?;
        let sql = self.console.read_block(false)?.join("\n");

        match report(&mut self.console, "executing query", db.execute_raw(&sql))? {
            Some(RawOutcome::Rows(rows)) if rows.is_empty() => {
                self.console.say("Query returned no rows.")
            }
            Some(RawOutcome::Rows(rows)) => {
                self.console.say("")?;
                self.console.say("Query Results:")?;
                self.console.say(rows_table(&rows))?;
                self.console.say(format!("({} rows)", rows.len()))
            }
            Some(RawOutcome::Executed { changes }) => self.console.say(format!(
                "Query executed successfully ({changes} rows affected)."
            )),
            None => Ok(()),
        }
    }

    pub(crate) fn query_builder(&mut self) -> Result<()> {
        let Some(db) = self.require_db()? else {
            return Ok(());
        };
        self.console.say("")?;
        self.console.say("Query Builder:")?;
        for line in numbered(
            &[
                "Select rows",
                "Select distinct values",
                "Count rows",
                "Sum a column",
                "Update rows",
                "Delete rows",
            ],
            "",
        ) {
            self.console.say(line)?;
        }
        let choice = self.console.prompt("Enter choice (1-6): ")?;
        if !matches!(choice.as_str(), "1" | "2" | "3" | "4" | "5" | "6") {
            return self.console.say("Invalid choice.");
        }
        let Some(table) = self.pick_table(&db, &TECHNICAL)? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" | "2" => {
                let columns = self
                    .console
                    .prompt("Columns (comma-separated, Enter for all): ")?;
                let columns = if columns.is_empty() { "*".to_owned() } else { columns };
                let condition = self.console.prompt("WHERE condition (Enter for none): ")?;
                let result = if choice == "1" {
                    db.select(&table, &columns, &condition)
                } else {
                    db.select_distinct(&table, &columns, &condition)
                };
                if let Some(rows) = report(&mut self.console, "selecting rows", result)? {
                    self.console.say(rows_table(&rows))?;
                    self.console.say(format!("({} rows)", rows.len()))?;
                }
            }
            "3" => {
                let condition = self.console.prompt("WHERE condition (Enter for none): ")?;
                if let Some(n) = report(&mut self.console, "counting rows", db.count(&table, &condition))? {
                    self.console.say(format!("Count: {n}"))?;
                }
            }
            "4" => {
                let column = self.console.prompt("Column to sum: ")?;
                let condition = self.console.prompt("WHERE condition (Enter for none): ")?;
                let result = db.sum(&table, &column, &condition);
                if let Some(total) = report(&mut self.console, "summing column", result)? {
                    self.console
                        .say(format!("Sum of {column}: {}", display_value(&total)))?;
                }
            }
            "5" => {
                let set_clause = self.console.prompt("SET clause (e.g. price = 9.99): ")?;
                if set_clause.is_empty() {
                    return self.console.say("Nothing to update.");
                }
                let condition = self.console.prompt("WHERE condition (required): ")?;
                let result = db.update(&table, &set_clause, &condition);
                if let Some(n) = report(&mut self.console, "updating rows", result)? {
                    self.console.say(format!("{n} row(s) updated."))?;
                }
            }
            _ => {
                let condition = self.console.prompt("WHERE condition (required): ")?;
                if !self.console.confirm("Delete matching rows?")? {
                    return self.console.say("Delete cancelled.");
                }
                let result = db.delete(&table, &condition);
                if let Some(n) = report(&mut self.console, "deleting rows", result)? {
                    self.console.say(format!("{n} row(s) deleted."))?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn show_info(&mut self, vocab: &Vocabulary) -> Result<()> {
        let Some(db) = self.require_db()? else {
            return Ok(());
        };

        self.console.say("")?;
        self.console.say(INFO_RULE)?;
        self.console.say("              DATABASE INFORMATION")?;
        self.console.say(INFO_RULE)?;
        self.console.say(format!("Database Name: {}", db.name()))?;
        self.console
            .say(format!("File Path: {}", db.path().display()))?;

        match report(&mut self.console, "reading metadata", db.get_metadata())? {
            Some(Some(metadata)) => {
                for line in metadata_lines(&metadata) {
                    self.console.say(line)?;
                }
            }
            Some(None) => self
                .console
                .say("No metadata available for this database.")?,
            None => {}
        }

        let action = format!("listing {}", vocab.tables);
        if let Some(tables) = report(&mut self.console, &action, db.list_tables())? {
            self.console
                .say(format!("Number of {}: {}", vocab.tables, tables.len()))?;
            if !tables.is_empty() {
                self.console
                    .say(format!("{}: {}", capitalize(vocab.tables), tables.join(", ")))?;
            }
        }
        Ok(())
    }

    /// Change description, purpose, owner and tags of the open database.
    pub(crate) fn edit_info(&mut self) -> Result<()> {
        let Some(db) = self.require_db()? else {
            return Ok(());
        };
        let Some(current) = report(&mut self.console, "reading metadata", db.get_metadata())? else {
            return Ok(());
        };
        let current = current.unwrap_or_default();

        self.console.say("")?;
        self.console
            .say("Edit Database Info (press Enter to keep the current value):")?;
        let mut changes = Metadata::new();
        for (key, label) in [
            (keys::DESCRIPTION, "Description"),
            (keys::PURPOSE, "Purpose/Project"),
            (keys::OWNER, "Owner/Creator"),
        ] {
            let shown = current.text(key).unwrap_or("N/A");
            let value = self.console.prompt(&format!("{label} [{shown}]: "))?;
            if !value.is_empty() {
                changes.insert(key, value);
            }
        }
        let shown = current
            .get(keys::TAGS)
            .map_or_else(|| "N/A".to_owned(), MetaValue::to_string);
        let tags = self.console.prompt(&format!("Tags [{shown}]: "))?;
        if !tags.is_empty() {
            changes.insert(keys::TAGS, split_list(&tags));
        }

        if changes.is_empty() {
            return self.console.say("No changes made.");
        }
        if report(&mut self.console, "updating metadata", db.update_metadata(&changes))?.is_some() {
            self.console.say("Database info updated.")?;
        }
        Ok(())
    }
}
