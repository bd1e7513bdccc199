//! Settings file loading.
//!
//! ```toml
//! [scoring]
//! percentage_weighting = 1.0
//! percentage_offset = 25.0
//! absolute_offset = 2.0
//!
//! [session]
//! shuffle = true
//! default_mode = "revise"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use revise_core::ScoringConfig;
use revise_core::scoring::ScoringConfigDraft;

use crate::error::ConfigError;
use crate::sessions::RunType;

/// Environment variable naming a settings file.
pub const CONFIG_ENV_VAR: &str = "REVISE_CONFIG";

/// Settings file looked for in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "revise.toml";

/// Session defaults applied when the command line does not override them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Shuffle the pool before the first sort.
    pub shuffle: bool,
    pub default_mode: RunType,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            shuffle: true,
            default_mode: RunType::Revise,
        }
    }
}

/// Validated application settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Settings {
    pub scoring: ScoringConfig,
    pub session: SessionSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    scoring: ScoringConfigDraft,
    session: SessionSettings,
}

impl Settings {
    /// Parses settings text; missing tables and keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::Scoring` for out-of-range scoring coefficients.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let file: SettingsFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        Ok(Self {
            scoring: ScoringConfig::try_from(file.scoring)?,
            session: file.session,
        })
    }

    /// Loads settings from `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable or invalid.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_toml(&content, path)
    }

    /// Loads settings from an explicit path, or searches the default locations.
    ///
    /// Search order:
    /// 1. `explicit`, which must exist
    /// 2. the file named by `REVISE_CONFIG`
    /// 3. `revise.toml` in the current directory
    ///
    /// Falls back to defaults when nothing is found.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a located file cannot be read or is invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Self::load_with(explicit, env_path.as_deref(), Path::new(LOCAL_CONFIG_FILE))
    }

    fn load_with(
        explicit: Option<&Path>,
        from_env: Option<&Path>,
        local: &Path,
    ) -> Result<Self, ConfigError> {
        let path = match (explicit, from_env) {
            (Some(path), _) | (None, Some(path)) => Some(path),
            (None, None) if local.exists() => Some(local),
            (None, None) => None,
        };

        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading settings");
                Self::load_file(path)
            }
            None => Ok(Self::default()),
        }
    }
}
