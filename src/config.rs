//! Settings for the `pixel-digest` binary.
//!
//! Loaded in this order, later sources overriding earlier ones:
//! 1. built-in defaults
//! 2. a TOML file (`pixel-digest.toml` unless another path is given; optional)
//! 3. environment variables prefixed with `PIXEL_DIGEST_`, nested keys split on `__`
//!
//! # Example
//! ```no_run
//! use pixel_digest::config::Settings;
//!
//! // PIXEL_DIGEST_GRID__MIN_UPPER=30 overrides `[grid] min_upper`
//! let settings = Settings::load()?;
//! settings.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

use clap::ValueEnum;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::digest::grid::GridPolicy;

pub const DEFAULT_CONFIG_FILE: &str = "pixel-digest.toml";
pub const ENV_PREFIX: &str = "PIXEL_DIGEST_";

/// How `inspect` prints each digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Bare digest text, one line per image.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// trace, debug, info, warn or error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridPolicy,
    pub output: OutputFormat,
    pub log: LogSettings,
}

impl Settings {
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log.level,
                valid_levels.join(", ")
            ));
        }
        if self.grid.divisor == 0 {
            return Err("grid.divisor must be at least 1".to_owned());
        }
        if self.grid.lower_bound == 0 {
            return Err("grid.lower_bound must be at least 1".to_owned());
        }
        if self.grid.min_upper <= self.grid.lower_bound {
            return Err(format!(
                "grid.min_upper ({}) must exceed grid.lower_bound ({})",
                self.grid.min_upper, self.grid.lower_bound
            ));
        }
        Ok(())
    }
}
