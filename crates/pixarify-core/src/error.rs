//! Error types for the Pixarify pipeline.
//!
//! Errors are organized by stage. Every pipeline error is terminal for the
//! current interaction: nothing is retried, and the message is shown to the
//! user as-is.

use thiserror::Error;

/// Top-level error type for Pixarify operations.
#[derive(Error, Debug)]
pub enum PixarifyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// A required API secret resolved to nothing
    #[error("{name} is not set. Set the {hint} environment variable or edit the config file.")]
    MissingSecret { name: &'static str, hint: String },
}

/// Pipeline errors, organized by stage.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    /// Upload carried no bytes
    #[error("The uploaded file is empty.")]
    EmptyUpload,

    /// Upload extension is not one of jpg/jpeg/png
    #[error("Unsupported image type '{extension}'. Upload a jpg, jpeg or png file.")]
    UnsupportedFormat { extension: String },

    /// Upload exceeds the configured size limit
    #[error("Uploaded file is too large ({size_mb}MB > {max_mb}MB).")]
    UploadTooLarge { size_mb: u64, max_mb: u64 },

    /// Description API answered with a non-success status
    #[error("Error from description API: {status}, {body}")]
    DescriptionHttp { status: u16, body: String },

    /// Description API could not be reached or its body could not be read
    #[error("Error contacting description API: {0}")]
    DescriptionTransport(String),

    /// Description API succeeded but carried no usable completion
    #[error("No description available.")]
    NoDescription,

    /// Generation call failed for any reason
    #[error("Error generating Pixarified image: {0}")]
    Generation(String),

    /// Generation succeeded but produced no output at the selected index
    #[error("Failed to generate Pixarified image.")]
    EmptyOutput,

    /// An interaction was driven through a transition it does not allow
    #[error("Cannot {action} while {state}.")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

impl PipelineError {
    /// HTTP status reported by the description API, if that is what failed.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PipelineError::DescriptionHttp { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error stems from what the user uploaded.
    pub fn is_intake(&self) -> bool {
        matches!(
            self,
            PipelineError::EmptyUpload
                | PipelineError::UnsupportedFormat { .. }
                | PipelineError::UploadTooLarge { .. }
        )
    }
}

/// Convenience type alias for Pixarify results.
pub type Result<T> = std::result::Result<T, PixarifyError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_http_message_includes_status_and_body() {
        let err = PipelineError::DescriptionHttp {
            status: 401,
            body: "invalid api key".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("invalid api key"));
        assert_eq!(err.status_code(), Some(401));
    }

    #[test]
    fn test_generation_error_carries_remote_message() {
        let err = PipelineError::Generation("NSFW content detected".to_string());
        assert!(err.to_string().contains("NSFW content detected"));
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_empty_output_message() {
        assert_eq!(
            PipelineError::EmptyOutput.to_string(),
            "Failed to generate Pixarified image."
        );
    }

    #[test]
    fn test_intake_classification() {
        assert!(PipelineError::EmptyUpload.is_intake());
        assert!(PipelineError::UnsupportedFormat {
            extension: "gif".into()
        }
        .is_intake());
        assert!(!PipelineError::NoDescription.is_intake());
    }

    #[test]
    fn test_missing_secret_mentions_env_var() {
        let err = ConfigError::MissingSecret {
            name: "OpenAI API key",
            hint: "OPENAI_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
