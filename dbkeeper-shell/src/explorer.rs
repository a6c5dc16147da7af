//! Beginner-friendly menu over the open database.
//!
//! Tables are "storage spaces", columns "fields" and rows "items".

use std::io::{BufRead, Write};

use tracing::debug;

use dbkeeper_store::metadata::keys;
use dbkeeper_store::{Database, Record, Value, quote_ident};

use crate::error::Result;
use crate::menu::Shell;
use crate::ops::report;
use crate::render::rows_table;
use crate::vocabulary::EXPLORER;

const EXPLORER_MENU: &[&str] = &[
    "See my storage spaces",
    "Look inside a storage space",
    "Create a new storage space",
    "Add an item",
    "Browse items",
    "Search items",
    "Database summary",
    "Back to main menu",
];

/// Search condition matching `text` literally anywhere in `field`.
///
/// `%`, `_` and `\` in `text` are escaped so they match themselves.
pub fn contains_condition(field: &str, text: &str) -> String {
    let pattern = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
        .replace('\'', "''");
    format!("{} LIKE '%{pattern}%' ESCAPE '\\'", quote_ident(field))
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub(crate) fn explorer(&mut self) -> Result<()> {
        let Some(db) = self.require_db()? else {
            return self.pause();
        };
        self.console.say("")?;
        self.console.say(format!(
            "Exploring '{}'. Storage spaces hold your items, fields describe them.",
            db.name()
        ))?;

        loop {
            self.show_menu("                 Data Explorer", EXPLORER_MENU)?;
            let choice = self
                .console
                .prompt(&format!("What would you like to do? (1-{}): ", EXPLORER_MENU.len()))?;
            debug!("Explorer choice {choice:?}");
            match choice.as_str() {
                "1" => self.overview(&db)?,
                "2" => self.show_schema(&EXPLORER)?,
                "3" => self.create_table_guided(&db, &EXPLORER)?,
                "4" => self.add_item(&db)?,
                "5" => self.view_rows(&EXPLORER)?,
                "6" => self.search(&db)?,
                "7" => self.summary(&db)?,
                "8" => return Ok(()),
                _ => {
                    self.console.say(format!(
                        "Please choose a number between 1 and {}.",
                        EXPLORER_MENU.len()
                    ))?;
                    continue;
                }
            }
            self.pause()?;
        }
    }

    /// Item and field count of every storage space.
    fn space_sizes(&mut self, db: &Database) -> Result<Option<Vec<(String, i64, usize)>>> {
        let Some(tables) = report(&mut self.console, "listing storage spaces", db.list_tables())?
        else {
            return Ok(None);
        };
        let mut sizes = Vec::with_capacity(tables.len());
        for table in tables {
            let Some(items) = report(&mut self.console, "counting items", db.count(&table, ""))?
            else {
                return Ok(None);
            };
            let Some(fields) =
                report(&mut self.console, "reading fields", db.column_names(&table))?
            else {
                return Ok(None);
            };
            sizes.push((table, items, fields.len()));
        }
        Ok(Some(sizes))
    }

    fn overview(&mut self, db: &Database) -> Result<()> {
        let Some(sizes) = self.space_sizes(db)? else {
            return Ok(());
        };
        if sizes.is_empty() {
            return self
                .console
                .say("You don't have any storage spaces yet. Create one to get started!");
        }
        self.console.say("")?;
        self.console.say("Your storage spaces:")?;
        for (i, (name, items, fields)) in sizes.iter().enumerate() {
            self.console.say(format!(
                "{}. {name}: {items} items, {fields} fields",
                i + 1
            ))?;
        }
        Ok(())
    }

    /// Prompt for each field of a storage space in turn.
    fn add_item(&mut self, db: &Database) -> Result<()> {
        let Some(table) = self.pick_table(db, &EXPLORER)? else {
            return Ok(());
        };
        let Some(Some(fields)) = report(&mut self.console, "reading fields", db.get_schema(&table))?
        else {
            return Ok(());
        };

        self.console
            .say("Fill in the fields for the new item (press Enter to leave one empty):")?;
        let mut record = Record::new();
        for field in &fields {
            if field.primary_key && field.declared_type.eq_ignore_ascii_case("INTEGER") {
                continue;
            }
            let label = EXPLORER.type_label(&field.declared_type);
            let value = self
                .console
                .prompt(&format!("  {} ({label}): ", field.name))?;
            if !value.is_empty() {
                record.insert(field.name.clone(), Value::Text(value));
            }
        }

        if record.is_empty() {
            return self.console.say("Nothing entered. No item added.");
        }
        if let Some(id) = report(&mut self.console, "adding item", db.insert(&table, &record))? {
            self.console.say(format!("Item added (number {id})."))?;
        }
        Ok(())
    }

    fn search(&mut self, db: &Database) -> Result<()> {
        let Some(table) = self.pick_table(db, &EXPLORER)? else {
            return Ok(());
        };
        let Some(fields) = report(&mut self.console, "reading fields", db.column_names(&table))?
        else {
            return Ok(());
        };
        self.console.say(format!("Fields: {}", fields.join(", ")))?;

        let field = self
            .console
            .prompt("Which field do you want to search in? ")?;
        if !fields.contains(&field) {
            return self
                .console
                .say(format!("There is no field called '{field}'."));
        }
        let text = self.console.prompt("What text are you looking for? ")?;

        let condition = contains_condition(&field, &text);
        let Some(rows) = report(&mut self.console, "searching", db.select(&table, "*", &condition))?
        else {
            return Ok(());
        };
        if rows.is_empty() {
            return self.console.say("No matching items found.");
        }
        self.console
            .say(format!("Found {} matching item(s):", rows.len()))?;
        self.console.say(rows_table(&rows))
    }

    fn summary(&mut self, db: &Database) -> Result<()> {
        self.console.say("")?;
        self.console.say(format!("Summary of '{}'", db.name()))?;
        if let Some(Some(metadata)) = report(&mut self.console, "reading metadata", db.get_metadata())? {
            if let Some(description) = metadata.text(keys::DESCRIPTION) {
                self.console.say(format!("About: {description}"))?;
            }
            if !metadata.tags().is_empty() {
                self.console
                    .say(format!("Tags: {}", metadata.tags().join(", ")))?;
            }
        }

        let Some(sizes) = self.space_sizes(db)? else {
            return Ok(());
        };
        let total: i64 = sizes.iter().map(|(_, items, _)| items).sum();
        self.console
            .say(format!("Storage spaces: {}", sizes.len()))?;
        self.console.say(format!("Total items: {total}"))?;
        for (name, items, _) in &sizes {
            self.console.say(format!("  {name}: {items} items"))?;
        }
        Ok(())
    }
}
