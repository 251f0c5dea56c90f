#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Settings for the SOTA map tools.
//!
//! Values are layered: built-in defaults, then a TOML file, then
//! environment variables. Command-line flags are applied last by the
//! binaries themselves.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "SOTA_MAP_CONFIG";

/// Settings file read from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "sota_map.toml";

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`Settings`].
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// File that was read.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// An environment variable holds an unusable value.
    #[error("Invalid value {value:?} for {var}")]
    Env {
        /// Variable name.
        var: &'static str,
        /// Value found.
        value: String,
    },

    /// Settings could not be rendered as TOML.
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// All settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// SOTA API base URL, without a trailing slash.
    pub api_base_url: String,
    /// Summit reference CSV.
    pub summits_csv: PathBuf,
    /// File that unknown summit references are appended to.
    pub errors_log: PathBuf,
    /// Static activations map.
    pub spots: SpotsSettings,
    /// Chases map.
    pub chases: ChasesSettings,
    /// Live dashboard.
    pub dashboard: DashboardSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api2.sota.org.uk/api".to_string(),
            summits_csv: PathBuf::from("summitslist.csv"),
            errors_log: PathBuf::from("summits_errors.txt"),
            spots: SpotsSettings::default(),
            chases: ChasesSettings::default(),
            dashboard: DashboardSettings::default(),
        }
    }
}

/// Settings for the static activations map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpotsSettings {
    /// Negative for hours back, positive for a count of recent spots.
    pub lookback: i32,
    /// Output HTML file.
    pub output: PathBuf,
}

impl Default for SpotsSettings {
    fn default() -> Self {
        Self {
            lookback: -1,
            output: PathBuf::from("activations_map.html"),
        }
    }
}

/// Settings for the chases map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChasesSettings {
    /// Output HTML file.
    pub output: PathBuf,
    /// Where to save the transliterated copy of the log, if anywhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_log: Option<PathBuf>,
    /// Encoding label for logs that are not UTF-8.
    pub log_encoding: String,
    /// Terrain tile URL template.
    pub tiles_url: String,
}

impl Default for ChasesSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("chases_map.html"),
            working_log: None,
            log_encoding: "windows-1250".to_string(),
            tiles_url: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png".to_string(),
        }
    }
}

/// Settings for the live dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardSettings {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

impl Settings {
    /// Loads settings from the file and process environment.
    ///
    /// The file is `explicit` if given, else the one named by
    /// `SOTA_MAP_CONFIG`, else `sota_map.toml` if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named file cannot be read or parsed, or
    /// an environment override is invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut settings = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using built-in defaults");
                    Self::default()
                }
            }
        };
        settings.apply_env(|var| std::env::var(var).ok())?;
        Ok(settings)
    }

    /// Reads settings from a TOML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Applies `SOTA_API_URL`, `BIND_ADDR` and `PORT` using `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if `PORT` is not a valid port number.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup("SOTA_API_URL") {
            self.api_base_url = url;
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            self.dashboard.bind_addr = addr;
        }
        if let Some(port) = lookup("PORT") {
            self.dashboard.port = port.trim().parse().map_err(|_| ConfigError::Env {
                var: "PORT",
                value: port,
            })?;
        }
        Ok(())
    }

    /// Renders the settings as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if rendering fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}
