use serde::Deserialize;
use std::ffi::OsString;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use dbkeeper_store::DEFAULT_DATA_DIR;

use crate::error::{IoContext, Result, ShellError};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "DBKEEPER_CONFIG";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dbkeeper.toml";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_page_size() -> usize {
    10
}

fn default_pause_after_action() -> bool {
    true
}

fn default_log_filter() -> String {
    "warn".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the `.db` files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Rows shown when viewing a table without an explicit count
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Wait for Enter after each menu action
    #[serde(default = "default_pause_after_action")]
    pub pause_after_action: bool,

    /// Tracing filter used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            page_size: default_page_size(),
            pause_after_action: default_pause_after_action(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)
            .io_context(|| format!("Failed to read config file at {}", path.display()))?;
        Self::from_toml(&contents)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ShellError::config("page_size must be greater than 0"));
        }
        Ok(())
    }
}

/// Load the configuration from `$DBKEEPER_CONFIG`, `./dbkeeper.toml` or defaults.
pub fn load() -> Result<Config> {
    load_from(std::env::var_os(CONFIG_ENV), Path::new(DEFAULT_CONFIG_FILE))
}

fn load_from(explicit: Option<OsString>, fallback: &Path) -> Result<Config> {
    match explicit {
        Some(path) => Config::from_file(Path::new(&path)),
        None if fallback.exists() => Config::from_file(fallback),
        None => Ok(Config::default()),
    }
}
