//! Configuration management for Pixarify.
//!
//! Configuration is loaded from a TOML file in the platform config directory.
//! Every field has a default; the two API secrets default to `${ENV_VAR}`
//! references that are resolved once at startup.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Pixarify.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Web server settings
    pub server: ServerConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Description stage settings
    pub description: DescriptionConfig,

    /// Generation stage settings
    pub generation: GenerationConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// API credentials resolved from config and environment.
#[derive(Clone)]
pub struct Secrets {
    pub openai_api_key: String,
    pub replicate_api_token: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets").finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.pixarify.pixarify/config.toml
    /// - Linux: ~/.config/pixarify/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\pixarify\config\config.toml
    ///
    /// Falls back to ~/.pixarify/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "pixarify", "pixarify")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = shellexpand::tilde("~").into_owned();
                PathBuf::from(home).join(".pixarify").join("config.toml")
            })
    }

    /// Resolve both API secrets.
    ///
    /// A secret that resolves to nothing is a startup failure.
    pub fn secrets(&self) -> Result<Secrets, ConfigError> {
        let openai_api_key =
            resolve_env_var(&self.description.api_key).ok_or_else(|| ConfigError::MissingSecret {
                name: "OpenAI API key",
                hint: env_var_name(&self.description.api_key)
                    .unwrap_or("OPENAI_API_KEY")
                    .to_string(),
            })?;
        let replicate_api_token =
            resolve_env_var(&self.generation.api_token).ok_or_else(|| {
                ConfigError::MissingSecret {
                    name: "Replicate API token",
                    hint: env_var_name(&self.generation.api_token)
                        .unwrap_or("REPLICATE_API_TOKEN")
                        .to_string(),
                }
            })?;

        Ok(Secrets {
            openai_api_key,
            replicate_api_token,
        })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if let Some(var_name) = env_var_name(value) {
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn env_var_name(value: &str) -> Option<&str> {
    value.strip_prefix("${")?.strip_suffix('}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::GenerationModel;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind_addr, "127.0.0.1:8501");
        assert_eq!(config.description.model, "gpt-4o");
        assert_eq!(config.description.max_tokens, 300);
        assert_eq!(config.generation.model, GenerationModel::PhotomakerStyle);
        assert_eq!(config.generation.output_index, 0);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[description]"));
        assert!(toml.contains("model = \"photomaker-style\""));
    }

    #[test]
    fn test_load_from_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[generation]\nmodel = \"t2i-adapter-sdxl-depth-midas\"\noutput_index = 1\n\n[limits]\nmax_upload_size_mb = 5"
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.generation.model, GenerationModel::T2iAdapterDepth);
        assert_eq!(config.generation.output_index, 1);
        assert_eq!(config.limits.max_upload_size_mb, 5);
        // Untouched sections keep their defaults
        assert_eq!(config.description.model, "gpt-4o");
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[generation]\noutput_index = 3").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("output_index"));
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nbind_addr = ").unwrap();
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_PIXARIFY_123}"), None);
    }

    #[test]
    fn test_secrets_missing_is_an_error() {
        let mut config = Config::default();
        config.description.api_key = "sk-test".to_string();
        config.generation.api_token = "${DEFINITELY_NOT_SET_PIXARIFY_456}".to_string();

        let err = config.secrets().unwrap_err();
        match err {
            ConfigError::MissingSecret { name, hint } => {
                assert_eq!(name, "Replicate API token");
                assert_eq!(hint, "DEFINITELY_NOT_SET_PIXARIFY_456");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_secrets_literal_values() {
        let mut config = Config::default();
        config.description.api_key = "sk-test".to_string();
        config.generation.api_token = "r8-test".to_string();

        let secrets = config.secrets().unwrap();
        assert_eq!(secrets.openai_api_key, "sk-test");
        assert_eq!(secrets.replicate_api_token, "r8-test");
        assert!(!format!("{secrets:?}").contains("sk-test"));
    }
}
