//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::StrataConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "strata.toml";

/// Loads and validates a `strata.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<StrataConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `strata.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<StrataConfig, ConfigError> {
    let config: StrataConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &StrataConfig) -> Result<(), ConfigError> {
    if config.project.name.trim().is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    Ok(())
}
