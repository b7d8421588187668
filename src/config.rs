//! Configuration for scout.
//!
//! Loaded from TOML; every section and field has a default, so an empty
//! file (or no file) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use scout_search::SearchConfig;

use crate::error::{Result, ScoutError};
use crate::history::DEFAULT_CUTOFF;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Provider request settings.
    pub search: SearchConfig,
    /// History suggestion settings.
    pub history: HistoryConfig,
    /// Host bridge settings.
    pub host: HostConfig,
}

/// History suggestion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Minimum similarity, in `[0, 1]`, for a past query to be suggested.
    pub cutoff: f64,
    /// Most suggestions returned with one result bundle.
    pub max_suggestions: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            max_suggestions: 3,
        }
    }
}

impl HistoryConfig {
    /// # Errors
    ///
    /// Returns [`ScoutError::Config`] if `cutoff` is outside `[0, 1]` or
    /// `max_suggestions` is 0.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.cutoff) {
            return Err(ScoutError::Config(format!(
                "history.cutoff must be within [0, 1], got {}",
                self.cutoff
            )));
        }
        if self.max_suggestions == 0 {
            return Err(ScoutError::Config(
                "history.max_suggestions must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// How the host bridge presents completed searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Bundle as structured JSON only.
    #[default]
    Json,
    /// Bundle plus a rendered text listing.
    Text,
}

/// Host bridge settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub output: OutputFormat,
}

impl ScoutConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ScoutError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ScoutError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/scout/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("scout")
            .join("config.toml")
    }

    /// Resolve the configuration a host should run with.
    ///
    /// `explicit` (typically `$SCOUT_CONFIG`) must exist if given. Otherwise
    /// the default path is used when present, and built-in defaults when not.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::info!(path = %path.display(), "loading config");
            return Self::from_file(path);
        }
        let default_path = Self::default_config_path();
        if default_path.is_file() {
            tracing::info!(path = %default_path.display(), "loading config");
            Self::from_file(&default_path)
        } else {
            tracing::debug!("no config file; using defaults");
            Ok(Self::default())
        }
    }

    /// The provider-facing settings, ready for a [`scout_search::SearchExecutor`].
    pub fn search_config(&self) -> SearchConfig {
        self.search.clone()
    }

    /// # Errors
    ///
    /// Returns [`ScoutError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.search
            .validate()
            .map_err(|e| ScoutError::Config(e.to_string()))?;
        self.history.validate()
    }
}
