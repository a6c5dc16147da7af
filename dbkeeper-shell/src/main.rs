// SPDX-FileCopyrightText: 2025 dbkeeper contributors
// SPDX-License-Identifier: MIT

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use rustyline::DefaultEditor;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dbkeeper_shell::{Console, Result, Session, Shell, config};

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let config = config::load()?;
    init_logging(&config.log_filter);
    info!("Using data directory {}", config.data_dir.display());

    let session = Session::from_config(&config);
    let output = io::stdout().lock();
    let console = if io::stdin().is_terminal() {
        Console::interactive(DefaultEditor::new()?, output)
    } else {
        Console::new(io::stdin().lock(), output)
    };
    Shell::new(session, console, config.pause_after_action).run()
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
