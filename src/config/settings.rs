//! On-disk settings
//!
//! ```toml
//! [placement]
//! alignment = "center"
//! dpi_band_min = 1.45
//! dpi_band_max = 1.55
//!
//! [watch]
//! program = "chrome"
//! alignment = "center|top"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every key is optional; absent keys take the defaults below.

use std::path::{Path, PathBuf};

use crate::domain::{Alignment, DpiBand};
use serde::Deserialize;
use thiserror::Error;

/// Directory under `%APPDATA%` holding the settings file
pub const CONFIG_DIR: &str = "DualScreen";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid DPI band: min {min} must be positive and below max {max}")]
    InvalidDpiBand { min: f64, max: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub placement: PlacementSettings,
    pub watch: WatchSettings,
    pub logging: LoggingSettings,
}

/// Defaults for `send` and `gather`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementSettings {
    /// Used when neither `--align` nor `--offset` is given; empty means the
    /// work area's top-left corner
    pub alignment: Alignment,
    /// Lower edge of the DPI ratio band (exclusive)
    pub dpi_band_min: f64,
    /// Upper edge of the DPI ratio band (exclusive)
    pub dpi_band_max: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            alignment: Alignment::empty(),
            dpi_band_min: DpiBand::DEFAULT_MIN,
            dpi_band_max: DpiBand::DEFAULT_MAX,
        }
    }
}

impl PlacementSettings {
    pub fn dpi_band(&self) -> DpiBand {
        DpiBand::new(self.dpi_band_min, self.dpi_band_max)
    }
}

/// Program that follows the secondary screen while `watch` runs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchSettings {
    pub program: Option<String>,
    pub alignment: Alignment,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            program: None,
            alignment: Alignment::CENTER,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// `tracing` level for this crate: error, warn, info, debug or trace
    pub level: Option<String>,
}

impl Settings {
    /// Parses and validates settings from TOML text
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.placement.dpi_band_min, self.placement.dpi_band_max);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min < max) {
            return Err(ConfigError::InvalidDpiBand { min, max });
        }
        Ok(())
    }

    /// The file `load` reads: `explicit`, else the default file if it exists
    pub fn source_path(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_path().filter(|path| path.exists()),
        }
    }

    /// Loads settings from `explicit`, or from the default location
    ///
    /// A missing file at the default location yields defaults. A missing
    /// explicit file is an error. Runs before logging is installed, so the
    /// caller reports which file was used.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::source_path(explicit) {
            Some(path) => Self::load_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }
}

/// `%APPDATA%\DualScreen\config.toml`, when `APPDATA` is set
pub fn default_path() -> Option<PathBuf> {
    std::env::var_os("APPDATA").map(|dir| PathBuf::from(dir).join(CONFIG_DIR).join(CONFIG_FILE))
}
