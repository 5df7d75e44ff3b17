//! Configuration loading.
//!
//! One TOML file at `~/.itinera/config.toml` plus the `GEMINI_API_KEY`
//! environment variable, which always wins over the file. `${VAR}` values in
//! the file are expanded from the environment so users can keep the literal
//! key out of the file entirely.

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use itinera_types::{ApiKey, ModelName, ModelParseError};

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Default, Deserialize)]
pub struct ItineraConfig {
    pub app: Option<AppSection>,
    pub api_keys: Option<ApiKeys>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppSection {
    pub model: Option<String>,
}

#[derive(Default, Deserialize)]
pub struct ApiKeys {
    pub google: Option<String>,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let google = if self.google.is_some() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("ApiKeys").field("google", &google).finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Location of the user config file, if a home directory exists.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".itinera").join("config.toml"))
}

/// Printable config location for error messages, with a portable fallback.
#[must_use]
pub fn config_path_hint() -> String {
    config_path().map_or_else(
        || "~/.itinera/config.toml".to_string(),
        |path| path.display().to_string(),
    )
}

/// Replace `${VAR}` occurrences with the variable's value (empty when
/// unset). Unclosed or empty braces are left as written.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                let var = &after[..end];
                out.push_str(&env::var(var).unwrap_or_default());
                rest = &after[end + 1..];
            }
            _ => {
                // Unclosed "${" or empty "${}": keep the literal text.
                out.push_str(&rest[start..start + 2]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

impl ItineraConfig {
    /// Load from the default location; a missing file is an empty config.
    pub fn load() -> Result<Self, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The effective API key: environment first, config file second.
    #[must_use]
    pub fn api_key(&self) -> Option<ApiKey> {
        self.api_key_from(env::var(API_KEY_ENV).ok())
    }

    fn api_key_from(&self, env_value: Option<String>) -> Option<ApiKey> {
        if let Some(key) = env_value
            && !key.trim().is_empty()
        {
            return Some(ApiKey::new(key));
        }

        let configured = self.api_keys.as_ref()?.google.as_deref()?;
        let expanded = expand_env_vars(configured);
        let trimmed = expanded.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(ApiKey::new(trimmed))
        }
    }

    /// The configured model, defaulting when the file names none.
    pub fn model(&self) -> Result<ModelName, ModelParseError> {
        match self.app.as_ref().and_then(|app| app.model.as_deref()) {
            Some(raw) => ModelName::parse(raw),
            None => Ok(ModelName::default()),
        }
    }
}
