//! Sub-configuration structs with their defaults.

use crate::generate::GenerationModel;
use serde::{Deserialize, Serialize};

/// Web server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the form UI listens on
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8501".to_string(),
        }
    }
}

/// Resource limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum upload size in megabytes
    pub max_upload_size_mb: u64,

    /// Description call timeout in milliseconds
    pub describe_timeout_ms: u64,

    /// Upper bound for a whole generation (create + polling) in milliseconds
    pub generate_timeout_ms: u64,

    /// Delay between prediction status polls in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: 20,
            describe_timeout_ms: 60_000,
            generate_timeout_ms: 300_000,
            poll_interval_ms: 1000,
        }
    }
}

impl LimitsConfig {
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}

/// Description stage (vision chat completion) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Chat completions endpoint
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Completion token cap
    pub max_tokens: u32,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o".to_string(),
            max_tokens: 300,
        }
    }
}

/// Generation stage (hosted image model) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// API token (supports ${ENV_VAR} syntax)
    pub api_token: String,

    /// Replicate API base URL
    pub endpoint: String,

    /// Which hosted model preset to run
    pub model: GenerationModel,

    /// Which element of the returned output list is displayed
    pub output_index: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_token: "${REPLICATE_API_TOKEN}".to_string(),
            endpoint: "https://api.replicate.com/v1".to_string(),
            model: GenerationModel::default(),
            output_index: 0,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
