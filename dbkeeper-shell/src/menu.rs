// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! The main (technical) menu and the loop driving it.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::console::Console;
use crate::error::{Result, ShellError};
use crate::session::Session;
use crate::vocabulary::TECHNICAL;

const RULE: &str = "==================================================";
const THIN_RULE: &str = "--------------------------------------------------";

const MAIN_MENU: &[&str] = &[
    "Open/Create Database",
    "List All Databases",
    "List Tables",
    "Create Table",
    "Show Table Schema",
    "Insert Data",
    "View Table Data",
    "Query Builder",
    "Execute SQL",
    "Show Database Info",
    "Edit Database Info",
    "Data Explorer (beginner-friendly)",
    "Close Database",
    "Exit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainAction {
    Open,
    ListDatabases,
    ListTables,
    CreateTable,
    ShowSchema,
    Insert,
    View,
    QueryBuilder,
    ExecuteSql,
    Info,
    EditInfo,
    Explorer,
    Close,
    Exit,
}

impl MainAction {
    fn from_choice(choice: &str) -> Option<Self> {
        let action = match choice.parse::<usize>().ok()? {
            1 => Self::Open,
            2 => Self::ListDatabases,
            3 => Self::ListTables,
            4 => Self::CreateTable,
            5 => Self::ShowSchema,
            6 => Self::Insert,
            7 => Self::View,
            8 => Self::QueryBuilder,
            9 => Self::ExecuteSql,
            10 => Self::Info,
            11 => Self::EditInfo,
            12 => Self::Explorer,
            13 => Self::Close,
            14 => Self::Exit,
            _ => return None,
        };
        Some(action)
    }
}

/// Interactive shell over one console.
pub struct Shell<R, W> {
    pub(crate) session: Session,
    pub(crate) console: Console<R, W>,
    pause: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(session: Session, console: Console<R, W>, pause: bool) -> Self {
        Self {
            session,
            console,
            pause,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        match self.main_loop() {
            Err(ShellError::InputClosed) => {
                debug!("Input closed, leaving shell");
                self.session.close();
                Ok(())
            }
            other => other,
        }
    }

    fn main_loop(&mut self) -> Result<()> {
        self.console.say("Welcome to dbkeeper, the SQLite database manager!")?;
        loop {
            self.show_menu("         dbkeeper - SQLite Database Manager", MAIN_MENU)?;
            if let Some(db) = self.session.current() {
                let line = format!("Current database: {}", db.name());
                self.console.say(line)?;
            }

            let choice = self
                .console
                .prompt(&format!("Enter your choice (1-{}): ", MAIN_MENU.len()))?;
            let Some(action) = MainAction::from_choice(&choice) else {
                self.console.say(format!(
                    "Invalid choice. Please select a number between 1 and {}.",
                    MAIN_MENU.len()
                ))?;
                continue;
            };
            debug!("Main menu action {action:?}");

            match action {
                MainAction::Open => self.open_database()?,
                MainAction::ListDatabases => self.list_databases()?,
                MainAction::ListTables => self.list_tables(&TECHNICAL)?,
                MainAction::CreateTable => self.create_table()?,
                MainAction::ShowSchema => self.show_schema(&TECHNICAL)?,
                MainAction::Insert => self.insert_pairs()?,
                MainAction::View => self.view_rows(&TECHNICAL)?,
                MainAction::QueryBuilder => self.query_builder()?,
                MainAction::ExecuteSql => self.execute_sql()?,
                MainAction::Info => self.show_info(&TECHNICAL)?,
                MainAction::EditInfo => self.edit_info()?,
                MainAction::Explorer => {
                    self.explorer()?;
                    continue;
                }
                MainAction::Close => self.close_database()?,
                MainAction::Exit => {
                    self.session.close();
                    self.console
                        .say("Thank you for using dbkeeper! Goodbye.")?;
                    return Ok(());
                }
            }
            self.pause()?;
        }
    }

    pub(crate) fn show_menu(&mut self, title: &str, items: &[&str]) -> Result<()> {
        self.console.say("")?;
        self.console.say(RULE)?;
        self.console.say(title)?;
        self.console.say(RULE)?;
        for (i, item) in items.iter().enumerate() {
            self.console.say(format!("{}. {item}", i + 1))?;
        }
        self.console.say(THIN_RULE)
    }

    pub(crate) fn pause(&mut self) -> Result<()> {
        if self.pause {
            self.console.say("")?;
            self.console.prompt("Press Enter to continue...")?;
        }
        Ok(())
    }

    fn close_database(&mut self) -> Result<()> {
        match self.session.close() {
            Some(db) => self
                .console
                .say(format!("Database '{}' closed successfully.", db.name())),
            None => self.console.say("No database is currently open."),
        }
    }
}
