//! Loading of `quill.toml` and installation of the global `tracing` subscriber.

mod logging;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use parking_lot::ReentrantMutex;
use quill_util::{parse_version, validate_version, TargetVersion, UsageError};
use serde::{Deserialize, Serialize};

pub use logging::{init_tracing, LoggingConfig};

/// Environment variable that overrides config discovery.
///
/// Relative values are resolved against the directory discovery starts from.
pub const QUILL_CONFIG_ENV_VAR: &str = "QUILL_CONFIG";

/// File name looked up by [`discover_config_path`].
pub const CONFIG_FILE_NAME: &str = "quill.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Toml(String),

    #[error("invalid target_version: {0}")]
    TargetVersion(#[from] UsageError),

    #[error("invalid logging.level directive: {level:?}")]
    LogLevel { level: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Toml(err.to_string())
    }
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuillConfig {
    /// Version of the analyzed language, as `<major>.<minor>`.
    #[serde(default = "QuillConfig::default_target_version")]
    pub target_version: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            target_version: Self::default_target_version(),
            logging: LoggingConfig::default(),
        }
    }
}

impl QuillConfig {
    fn default_target_version() -> String {
        quill_util::MAX_SUPPORTED.to_string()
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            target: "quill.config",
            path = %path.display(),
            target_version = %config.target_version,
            "loaded config"
        );
        Ok(config)
    }

    /// The parsed and range-checked `target_version`.
    pub fn target_version(&self) -> Result<TargetVersion> {
        let parts = parse_version(&self.target_version)?;
        Ok(validate_version(&parts)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.target_version()?;
        if !self.logging.level_is_valid() {
            return Err(ConfigError::LogLevel {
                level: self.logging.level.clone(),
            });
        }
        Ok(())
    }
}

static CONFIG_ENV_LOCK: OnceLock<ReentrantMutex<()>> = OnceLock::new();

fn config_env_lock() -> &'static ReentrantMutex<()> {
    CONFIG_ENV_LOCK.get_or_init(|| ReentrantMutex::new(()))
}

/// Runs `f` while holding the lock that config discovery takes before reading
/// [`QUILL_CONFIG_ENV_VAR`].
///
/// Tests that set the variable should mutate it inside this helper so that
/// discovery running on other test threads never sees the override.
pub fn with_config_env_lock<R>(f: impl FnOnce() -> R) -> R {
    let _guard = config_env_lock().lock();
    f()
}

/// Finds the config file that applies to `start`.
///
/// Search order:
/// 1) `QUILL_CONFIG` (absolute, or relative to `start`)
/// 2) `quill.toml` in `start` or the nearest ancestor that has one
pub fn discover_config_path(start: &Path) -> Option<PathBuf> {
    let _guard = config_env_lock().lock();
    if let Some(value) = std::env::var_os(QUILL_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        let path = if candidate.is_absolute() {
            candidate
        } else {
            start.join(candidate)
        };
        return Some(path.canonicalize().unwrap_or(path));
    }

    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
        .map(|path| path.canonicalize().unwrap_or(path))
}

/// Loads the config that applies to `workspace_root`.
///
/// If no config is present, returns [`QuillConfig::default`] and `None`.
pub fn load_for_workspace(workspace_root: &Path) -> Result<(QuillConfig, Option<PathBuf>)> {
    let Some(path) = discover_config_path(workspace_root) else {
        tracing::debug!(
            target: "quill.config",
            root = %workspace_root.display(),
            "no config found; using defaults"
        );
        return Ok((QuillConfig::default(), None));
    };

    let config = QuillConfig::load_from_path(&path)?;
    Ok((config, Some(path)))
}
