//! Pixarify Core - portrait in, Pixar-style character out.
//!
//! A linear pipeline over two hosted services:
//!
//! ```text
//! Upload → Intake → Describe (vision chat model) → Generate (hosted image model) → Output URL
//! ```
//!
//! Nothing is cached or persisted. Every value lives for exactly one user
//! interaction, and every failure is terminal for that interaction.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pixarify_core::{Config, Interaction, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = Pipeline::from_config(&config)?;
//!
//!     let image = pipeline.intake().accept_file("./me.jpg".as_ref())?;
//!     let mut interaction = Interaction::new();
//!     interaction.upload(image)?;
//!     let url = interaction.run(&pipeline, |_| {}).await?;
//!     println!("{url}");
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod describe;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use describe::{Describer, OpenAiDescriber};
pub use error::{ConfigError, PipelineError, PipelineResult, PixarifyError, Result};
pub use generate::{GenerationModel, GenerationRequest, Generator, ReplicateGenerator};
pub use pipeline::{Intake, Interaction, InteractionState, Phase, Pipeline, PipelineOutput};
pub use types::{DescriptionResult, GeneratedImageReference, ImageFormat, UploadedImage};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
