use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Root matcher configuration, loaded from `~/.config/pidmatch/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub cascade: CascadeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Probe an ahead-of-print candidate after the issue-scoped one for
    /// documents that already carry issue data.
    pub aop_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_key_sets: bool,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for CascadeConfig {
    fn default() -> Self {
        Self { aop_fallback: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { log_key_sets: true }
    }
}

// ─── Load / Save ───────────────────────────────────────────

pub const CONFIG_ENV_VAR: &str = "PIDMATCH_CONFIG";

impl MatchConfig {
    /// `$PIDMATCH_CONFIG`, else `pidmatch/config.toml` under the user config dir.
    pub fn config_path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("~/.config"))
                .join("pidmatch")
                .join("config.toml"),
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// A missing file yields the defaults; anything other than a regular
    /// file at `path` is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(CoreError::Config(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Writes pretty TOML, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}
