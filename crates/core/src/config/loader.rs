use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::CatalogConfig, ConfigError};

/// Load configuration from file with environment variable overrides.
///
/// Environment keys use `VIDCAT_` and a double underscore between
/// section and field, e.g. `VIDCAT_THUMBS__BASE_URL`.
pub fn load_config(path: &Path) -> Result<CatalogConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: CatalogConfig = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("VIDCAT_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<CatalogConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
