// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

//! Interactive terminal manager for dbkeeper databases.
//!
//! [`Shell`] runs the numbered main menu and the beginner-friendly data
//! explorer over any [`Console`]. Storage goes through [`dbkeeper_store`].

pub mod config;
pub mod console;
pub mod error;
mod explorer;
pub mod forms;
mod menu;
mod ops;
pub mod render;
pub mod session;
pub mod vocabulary;

pub use config::Config;
pub use console::Console;
pub use error::{Result, ShellError};
pub use explorer::contains_condition;
pub use menu::Shell;
pub use session::Session;
