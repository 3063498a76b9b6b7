use super::{types::CatalogConfig, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Search tokens have a positive minimum length
/// - Keyword draws have a positive budget
/// - Related keyword pool and step bound are positive
pub fn validate_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    if config.text.min_search_token_len == 0 {
        return Err(ConfigError::ValidationError(
            "text.min_search_token_len cannot be 0".to_string(),
        ));
    }

    if config.sampling.keyword_draw_factor == 0 {
        return Err(ConfigError::ValidationError(
            "sampling.keyword_draw_factor cannot be 0".to_string(),
        ));
    }

    if config.related.pool_size == 0 {
        return Err(ConfigError::ValidationError(
            "related.pool_size cannot be 0".to_string(),
        ));
    }

    if config.related.max_steps == 0 {
        return Err(ConfigError::ValidationError(
            "related.max_steps cannot be 0".to_string(),
        ));
    }

    if config.related.min_candidates > config.related.pool_size {
        return Err(ConfigError::ValidationError(format!(
            "related.min_candidates ({}) exceeds related.pool_size ({})",
            config.related.min_candidates, config.related.pool_size
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RelatedConfig, SamplingConfig, TextConfig};

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&CatalogConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_token_len_fails() {
        let config = CatalogConfig {
            text: TextConfig {
                min_search_token_len: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_draw_factor_fails() {
        let config = CatalogConfig {
            sampling: SamplingConfig {
                keyword_draw_factor: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_min_candidates_above_pool_fails() {
        let config = CatalogConfig {
            related: RelatedConfig {
                pool_size: 10,
                min_candidates: 20,
                max_steps: 100,
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("min_candidates"));
    }
}
