//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_upload_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_upload_size_mb must be > 0".into(),
            ));
        }
        if self.limits.describe_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.describe_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.generate_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.generate_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.poll_interval_ms must be > 0".into(),
            ));
        }
        if self.description.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "description.max_tokens must be > 0".into(),
            ));
        }
        let outputs = self.generation.model.output_count();
        if self.generation.output_index >= outputs {
            return Err(ConfigError::ValidationError(format!(
                "generation.output_index must be < {outputs} for model {}",
                self.generation.model
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::GenerationModel;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_upload_limit() {
        let mut config = Config::default();
        config.limits.max_upload_size_mb = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_upload_size_mb"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.generate_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("generate_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_zero_max_tokens() {
        let mut config = Config::default();
        config.description.max_tokens = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn test_validate_output_index_against_model() {
        let mut config = Config::default();
        config.generation.model = GenerationModel::PhotomakerStyle;
        config.generation.output_index = 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output_index"));

        // The depth adapter variant yields two outputs.
        config.generation.model = GenerationModel::T2iAdapterDepth;
        assert!(config.validate().is_ok());
    }
}
