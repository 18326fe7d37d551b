//! Optional user configuration, read from `logging.toml` in the user config directory.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::utils;

/// File name of the configuration file, placed under
/// [`PathSet::user_config_dir`](crate::paths::PathSet::user_config_dir).
pub const CONFIG_FILE_NAME: &str = "logging.toml";

#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    pub logging: LoggingSettings,
}

impl Configuration {
    pub fn from_toml(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Mirror the log on the terminal.
    pub console: bool,
    pub colored: bool,
    /// Show `DEBUG` lines on the terminal too.
    pub verbose: bool,
    /// Extra log targets that should only report errors, on top of
    /// [`NOISY_TARGETS`](crate::utils::NOISY_TARGETS).
    pub quiet_targets: Vec<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            console: true,
            colored: false,
            verbose: false,
            quiet_targets: Vec::new(),
        }
    }
}

/// A convenient function to load [`Configuration`] from a `toml` file.
pub fn load(path: &Path) -> Result<Configuration> {
    let conf_str = utils::read_to_string(path)?;
    Configuration::from_toml(&conf_str)
}

/// Load the configuration at `path`, or fall back to defaults if there is no such file.
pub fn load_or_default(path: &Path) -> Result<Configuration> {
    if path.is_file() {
        load(path)
    } else {
        Ok(Configuration::default())
    }
}
