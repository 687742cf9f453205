//! Pipeline orchestration - wires together intake, description and generation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::describe::{Describer, OpenAiDescriber};
use crate::error::{ConfigError, PipelineError, PipelineResult};
use crate::generate::{GenerationRequest, Generator, ReplicateGenerator};
use crate::types::{DescriptionResult, GeneratedImageReference, UploadedImage};

use super::intake::Intake;

/// What one successful run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub description: DescriptionResult,
    pub image: GeneratedImageReference,
}

/// The linear portrait pipeline: describe, generate, select.
///
/// Holds no per-interaction state, so one instance is shared by every
/// concurrent user.
#[derive(Clone)]
pub struct Pipeline {
    intake: Intake,
    describer: Arc<dyn Describer>,
    generator: Arc<dyn Generator>,
    output_index: usize,
}

impl Pipeline {
    pub fn new(
        intake: Intake,
        describer: Arc<dyn Describer>,
        generator: Arc<dyn Generator>,
        output_index: usize,
    ) -> Self {
        Self {
            intake,
            describer,
            generator,
            output_index,
        }
    }

    /// Build the production pipeline (OpenAI + Replicate) from configuration.
    ///
    /// Fails if either API secret is missing.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let secrets = config.secrets()?;
        let limits = &config.limits;

        let describer = OpenAiDescriber::new(
            &secrets.openai_api_key,
            &config.description,
            Duration::from_millis(limits.describe_timeout_ms),
        );
        let generator = ReplicateGenerator::new(
            &secrets.replicate_api_token,
            &config.generation.endpoint,
            config.generation.model,
            Duration::from_millis(limits.poll_interval_ms),
            Duration::from_millis(limits.generate_timeout_ms),
        );

        tracing::debug!(
            description_model = %config.description.model,
            generation_model = %config.generation.model,
            output_index = config.generation.output_index,
            "Pipeline configured"
        );

        Ok(Self::new(
            Intake::new(limits.clone()),
            Arc::new(describer),
            Arc::new(generator),
            config.generation.output_index,
        ))
    }

    pub fn intake(&self) -> &Intake {
        &self.intake
    }

    pub fn output_index(&self) -> usize {
        self.output_index
    }

    /// Description stage.
    pub async fn describe(&self, image: &UploadedImage) -> PipelineResult<DescriptionResult> {
        let start = Instant::now();
        let result = self.describer.describe(image).await;
        match &result {
            Ok(description) => tracing::debug!(
                describer = self.describer.name(),
                attributes = description.attributes().count(),
                elapsed = ?start.elapsed(),
                "Describe stage done"
            ),
            Err(e) => tracing::warn!(describer = self.describer.name(), "Describe stage failed: {e}"),
        }
        result
    }

    /// Generation stage, including selection of the displayed output.
    pub async fn generate(
        &self,
        image: &UploadedImage,
        description: &DescriptionResult,
    ) -> PipelineResult<GeneratedImageReference> {
        let start = Instant::now();
        let request = GenerationRequest {
            description: description.clone(),
            image: image.clone(),
        };

        let outputs = self.generator.generate(&request).await.inspect_err(|e| {
            tracing::warn!(generator = self.generator.name(), "Generate stage failed: {e}")
        })?;

        let selected = outputs.into_iter().nth(self.output_index).ok_or_else(|| {
            tracing::warn!(
                generator = self.generator.name(),
                output_index = self.output_index,
                "No output at the selected index"
            );
            PipelineError::EmptyOutput
        })?;

        tracing::debug!(
            generator = self.generator.name(),
            elapsed = ?start.elapsed(),
            "Generate stage done"
        );
        Ok(GeneratedImageReference::new(selected))
    }

    /// Run both stages for one upload.
    ///
    /// Generation is never invoked if the description stage fails.
    pub async fn run(&self, image: &UploadedImage) -> PipelineResult<PipelineOutput> {
        let description = self.describe(image).await?;
        let output = self.generate(image, &description).await?;
        Ok(PipelineOutput {
            description,
            image: output,
        })
    }
}
