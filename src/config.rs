//! Studio configuration: defaults, optional TOML file, environment overrides.
//!
//! The credential is never cached across calls. Hosts re-run
//! [`StudioConfig::load`] for every command so a rotated key takes effect on
//! the next render without a restart.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StudioError;
use crate::studio::Language;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Per-call HTTP timeout for generation requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Environment variables holding the credential, checked in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];
pub const MODEL_VAR: &str = "EASYSOCIAL_MODEL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub language: Language,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            language: Language::En,
        }
    }
}

impl StudioConfig {
    /// Resolve configuration from defaults, the config file and the process
    /// environment.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present and silently skipped otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_path(path)? {
            Some(file) => {
                info!("Loading studio config from {:?}", file);
                Self::from_file(&file)?
            }
            None => {
                debug!("No studio config file found, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// The config file `load` would read, if any.
    pub fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>> {
        match path {
            Some(p) if p.is_file() => Ok(Some(p.to_path_buf())),
            Some(p) => bail!("Config file not found: {:?}", p),
            None => Ok(Self::default_path().filter(|p| p.is_file())),
        }
    }

    /// `<config_dir>/easysocial/studio.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("easysocial").join("studio.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StudioConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply environment-style overrides. `lookup` returns the value of a
    /// variable, or `None` when unset.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|v| !v.trim().is_empty())
        {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup(MODEL_VAR).filter(|m| !m.trim().is_empty()) {
            self.model = model;
        }
    }

    /// The configured credential, validated.
    pub fn credential(&self) -> Result<Credential, StudioError> {
        match self.api_key.as_deref() {
            Some(raw) => Credential::new(raw),
            None => Err(StudioError::ConfigurationMissing(format!(
                "API key is not set. Export {} and try again.",
                API_KEY_VARS[0]
            ))),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_ok()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// A validated API key. `Debug` never prints the secret.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: &str) -> Result<Self, StudioError> {
        let key = raw.trim();
        if key.is_empty() {
            return Err(StudioError::ConfigurationMissing(
                "API key is empty".to_string(),
            ));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(StudioError::ConfigurationMissing(
                "API key is malformed (contains whitespace)".to_string(),
            ));
        }
        Ok(Self(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
