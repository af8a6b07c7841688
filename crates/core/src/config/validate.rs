use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Generation settings are usable when generation is enabled
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Generation validation (only when enabled)
    if config.generation.enabled {
        if config.generation.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "generation.poll_interval_secs cannot be 0".to_string(),
            ));
        }

        if config.generation.horde.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "generation.horde.url cannot be empty".to_string(),
            ));
        }

        if !config.generation.horde.prompt_template.contains("{mode}") {
            return Err(ConfigError::ValidationError(
                "generation.horde.prompt_template must contain {mode}".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_validate_zero_poll_interval_fails_when_enabled() {
        let mut config = Config::default();
        config.generation.poll_interval_secs = 0;
        assert!(validate_config(&config).is_err());

        // Irrelevant when generation is disabled
        config.generation.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_prompt_template_placeholder() {
        let mut config = Config::default();
        config.generation.horde.prompt_template = "A nice trip".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_url_fails_when_enabled() {
        let mut config = Config::default();
        config.generation.horde.url = String::new();
        assert!(validate_config(&config).is_err());
    }
}
