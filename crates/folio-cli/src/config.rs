//! Editor configuration loaded from RON.
//!
//! Looked up at `$XDG_CONFIG_HOME/folio/folio.ron` (or the platform
//! equivalent) unless a path is given. A missing default file means
//! defaults; a missing explicit file is an error.

use std::path::{Path, PathBuf};

use folio_assist::AssistConfig;
use folio_doc::PageConfig;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Page budget and per-kind overheads.
    pub pagination: PageConfig,
    /// Assistant model and prompt settings.
    pub assist: AssistConfig,
    /// SQLite database for saved documents and history.
    pub database: Option<PathBuf>,
}

/// Error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON write error: {0}")]
    RonWrite(#[from] ron::Error),
}

impl EditorConfig {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("folio").join("folio.ron"))
    }

    /// Default database location.
    pub fn default_database() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("folio").join("folio.db"))
    }

    /// Parse from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Render as pretty RON.
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, PrettyConfig::default())?)
    }

    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let config = Self::from_ron(&text)?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    /// Database path: configured, else the platform default.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database.clone().or_else(Self::default_database)
    }
}
