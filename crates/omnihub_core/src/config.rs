//! File and environment configuration.
//!
//! # Responsibility
//! - Read the optional `~/.omnihub/config.toml`.
//! - Layer environment overrides and `${VAR}` expansion on top.
//! - Produce fully resolved paths and model settings for callers.
//!
//! # Invariants
//! - A missing config file is not an error; every section is optional.
//! - Environment variables win over file values.

use crate::interpret::gemini::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::interpret::interpreter::{DEFAULT_BREAKDOWN_MODEL, DEFAULT_SMART_INPUT_MODEL};
use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = ".omnihub";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "omnihub.db";
const LOG_DIR_NAME: &str = "logs";

pub const ENV_DB_PATH: &str = "OMNIHUB_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "OMNIHUB_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "OMNIHUB_LOG_DIR";
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_API_KEY_FALLBACK: &str = "API_KEY";

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    /// No home directory and no explicit paths were given.
    NoDataDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::NoDataDir => write!(f, "cannot determine a data directory; set {ENV_DB_PATH}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::NoDataDir => None,
        }
    }
}

/// Raw `config.toml` contents.
#[derive(Debug, Default, Deserialize)]
pub struct OmniConfig {
    pub storage: Option<StorageConfig>,
    pub logging: Option<LoggingConfig>,
    pub ai: Option<AiConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    pub db_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub smart_input_model: Option<String>,
    pub breakdown_model: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Language-model settings; present only when an API key is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSettings {
    pub api_key: String,
    pub base_url: String,
    pub smart_input_model: String,
    pub breakdown_model: String,
    pub timeout_secs: u64,
}

/// Configuration after defaults, file values and environment are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub ai: Option<AiSettings>,
}

impl OmniConfig {
    /// Default config file location.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads the default config file; absent file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolves against the process environment and home directory.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        self.resolve_with_db(None)
    }

    /// Like [`OmniConfig::resolve`], with `db_path` ahead of every other
    /// database setting. A given path needs no home directory.
    pub fn resolve_with_db(&self, db_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
        let data_dir = dirs::home_dir().map(|home| home.join(APP_DIR_NAME));
        self.resolve_with(
            data_dir.as_deref(),
            with_db_path(db_path, |name| std::env::var(name).ok()),
        )
    }

    /// Resolves with an explicit data directory and environment lookup.
    pub fn resolve_with(
        &self,
        data_dir: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let lookup = |name: &str| env(name).filter(|value| !value.trim().is_empty());
        let expand = |value: &str| expand_env_vars(value, &env);

        let storage = self.storage.as_ref();
        let logging = self.logging.as_ref();
        let ai = self.ai.as_ref();

        let db_path = match lookup(ENV_DB_PATH)
            .or_else(|| storage.and_then(|s| s.db_path.as_deref()).map(expand))
        {
            Some(path) => PathBuf::from(path),
            None => data_dir.ok_or(ConfigError::NoDataDir)?.join(DB_FILE_NAME),
        };

        let log_dir = match lookup(ENV_LOG_DIR)
            .or_else(|| logging.and_then(|l| l.dir.as_deref()).map(expand))
        {
            Some(dir) => PathBuf::from(dir),
            None => match data_dir {
                Some(dir) => dir.join(LOG_DIR_NAME),
                None => db_path
                    .parent()
                    .map(|parent| parent.join(LOG_DIR_NAME))
                    .ok_or(ConfigError::NoDataDir)?,
            },
        };

        let log_level = lookup(ENV_LOG_LEVEL)
            .or_else(|| logging.and_then(|l| l.level.clone()))
            .unwrap_or_else(|| default_log_level().to_string());

        let api_key = lookup(ENV_API_KEY)
            .or_else(|| lookup(ENV_API_KEY_FALLBACK))
            .or_else(|| ai.and_then(|a| a.api_key.as_deref()).map(expand))
            .filter(|key| !key.trim().is_empty());

        let ai = api_key.map(|api_key| AiSettings {
            api_key,
            base_url: ai
                .and_then(|a| a.base_url.as_deref())
                .map(expand)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            smart_input_model: ai
                .and_then(|a| a.smart_input_model.clone())
                .unwrap_or_else(|| DEFAULT_SMART_INPUT_MODEL.to_string()),
            breakdown_model: ai
                .and_then(|a| a.breakdown_model.clone())
                .unwrap_or_else(|| DEFAULT_BREAKDOWN_MODEL.to_string()),
            timeout_secs: ai
                .and_then(|a| a.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        });

        Ok(ResolvedConfig {
            db_path,
            log_level,
            log_dir,
            ai,
        })
    }
}

/// Replaces `${VAR}` with the variable's value (empty when unset).
pub fn expand_env_vars(value: &str, env: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if !name.is_empty() {
                    out.push_str(&env(name).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Wraps `env` so that `db_path`, when given, answers for `OMNIHUB_DB_PATH`.
pub fn with_db_path<'a>(
    db_path: Option<&'a Path>,
    env: impl Fn(&str) -> Option<String> + 'a,
) -> impl Fn(&str) -> Option<String> + 'a {
    move |name| match db_path {
        Some(path) if name == ENV_DB_PATH => Some(path.to_string_lossy().into_owned()),
        _ => env(name),
    }
}
