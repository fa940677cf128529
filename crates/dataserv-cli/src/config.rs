//! CLI configuration
//!
//! Resolution order: `--config <path>`, then `dataserv.toml` in the working
//! directory, then built-in defaults. Individual flags override the file.

use std::path::{Path, PathBuf};

use dataserv_core::logging_facility::Profile;
use dataserv_core::{DataservError, Result, DEFAULT_BYTE_SIZE};
use serde::Deserialize;

/// File looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "dataserv.toml";

/// Upper bound on `online_minutes`: ten years
pub const MAX_ONLINE_MINUTES: i64 = 60 * 24 * 365 * 10;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite database holding farmer records
    pub db_path: PathBuf,
    /// Contract size when `contract` is run without `--byte-size`
    pub byte_size: u64,
    /// How recently a farmer must have been seen to count as online
    pub online_minutes: i64,
    pub log_profile: String,
    /// Accept testnet address versions
    pub allow_testnet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(".dataserv/farmers.db"),
            byte_size: DEFAULT_BYTE_SIZE,
            online_minutes: 15,
            log_profile: "development".to_string(),
            allow_testnet: false,
        }
    }
}

impl Config {
    /// Load configuration, falling back to `dataserv.toml` and then defaults
    ///
    /// # Errors
    ///
    /// Returns `Config` if an explicit file is missing, any file fails to
    /// parse, or a value is out of range.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Self::from_file(implicit)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `Config` on read or parse failure.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DataservError::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::parse(&text).map_err(|e| DataservError::Config {
            message: format!("{}: {}", path.display(), e),
        })
    }

    fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// # Errors
    ///
    /// Returns `Config` naming the first out-of-range value.
    pub fn validate(&self) -> Result<()> {
        if self.byte_size == 0 {
            return Err(config_error("byte_size must be positive"));
        }
        if !(0..=MAX_ONLINE_MINUTES).contains(&self.online_minutes) {
            return Err(config_error(&format!(
                "online_minutes must be between 0 and {}",
                MAX_ONLINE_MINUTES
            )));
        }
        self.profile()?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `Config` for an unknown profile name.
    pub fn profile(&self) -> Result<Profile> {
        self.log_profile.parse().map_err(|e: String| config_error(&e))
    }

    /// # Errors
    ///
    /// Returns `Config` if `online_minutes` does not fit a duration.
    pub fn online_window(&self) -> Result<chrono::Duration> {
        chrono::Duration::try_minutes(self.online_minutes)
            .ok_or_else(|| config_error("online_minutes is out of range"))
    }
}

fn config_error(message: &str) -> DataservError {
    DataservError::Config {
        message: message.to_string(),
    }
}
