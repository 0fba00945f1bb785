use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::StudioConfig;
use crate::studio::Language;

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub api_key_set: bool,
    pub model: String,
    pub endpoint: String,
    pub language: Language,
    pub config_path: Option<String>,
    /// Set when the config file could not be loaded
    pub config_error: Option<String>,
}

pub fn run_health_check(config_path: Option<&Path>) -> HealthReport {
    info!("Running health check");

    let resolved = StudioConfig::resolve_path(config_path).ok().flatten();
    let (config, config_error) = match StudioConfig::load(config_path) {
        Ok(config) => (config, None),
        Err(e) => (StudioConfig::default(), Some(format!("{:#}", e))),
    };

    let api_key_set = config.has_credential();
    info!("API key set: {}, model: {}", api_key_set, config.model);

    HealthReport {
        api_key_set,
        model: config.model,
        endpoint: config.endpoint,
        language: config.language,
        config_path: resolved.map(|p| p.to_string_lossy().to_string()),
        config_error,
    }
}
