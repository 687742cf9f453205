//! Per-user interaction state machine.
//!
//! ```text
//! Idle → ImageUploaded → Describing → Generating → Displayed
//!                            │             │
//!                            └──→ Error ←──┘
//! ```
//!
//! `Error` and `Displayed` are terminal until [`Interaction::retry`], which
//! always lands back in `Idle` with nothing carried over.

use std::fmt;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{DescriptionResult, GeneratedImageReference, UploadedImage};

use super::processor::Pipeline;

/// Where an interaction currently is, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ImageUploaded,
    Describing,
    Generating,
    Displayed,
    Error,
}

impl Phase {
    fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::ImageUploaded => "image uploaded",
            Phase::Describing => "describing",
            Phase::Generating => "generating",
            Phase::Displayed => "displayed",
            Phase::Error => "in error",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interaction state with the data each phase owns.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    ImageUploaded {
        image: UploadedImage,
    },
    Describing {
        image: UploadedImage,
    },
    Generating {
        image: UploadedImage,
        description: DescriptionResult,
    },
    Displayed {
        image: UploadedImage,
        description: DescriptionResult,
        result: GeneratedImageReference,
    },
    Error {
        image: UploadedImage,
        error: PipelineError,
    },
}

impl InteractionState {
    pub fn phase(&self) -> Phase {
        match self {
            InteractionState::Idle => Phase::Idle,
            InteractionState::ImageUploaded { .. } => Phase::ImageUploaded,
            InteractionState::Describing { .. } => Phase::Describing,
            InteractionState::Generating { .. } => Phase::Generating,
            InteractionState::Displayed { .. } => Phase::Displayed,
            InteractionState::Error { .. } => Phase::Error,
        }
    }
}

/// One user's pass through the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    state: InteractionState,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// The upload currently held, if any.
    pub fn uploaded_image(&self) -> Option<&UploadedImage> {
        match &self.state {
            InteractionState::Idle => None,
            InteractionState::ImageUploaded { image }
            | InteractionState::Describing { image }
            | InteractionState::Generating { image, .. }
            | InteractionState::Displayed { image, .. }
            | InteractionState::Error { image, .. } => Some(image),
        }
    }

    pub fn description(&self) -> Option<&DescriptionResult> {
        match &self.state {
            InteractionState::Generating { description, .. }
            | InteractionState::Displayed { description, .. } => Some(description),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&GeneratedImageReference> {
        match &self.state {
            InteractionState::Displayed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match &self.state {
            InteractionState::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    /// `Idle → ImageUploaded`.
    pub fn upload(&mut self, image: UploadedImage) -> PipelineResult<()> {
        if !matches!(self.state, InteractionState::Idle) {
            return Err(self.invalid("upload"));
        }
        self.state = InteractionState::ImageUploaded { image };
        Ok(())
    }

    /// Drive `ImageUploaded → Describing → Generating → Displayed`, or into
    /// `Error` from either remote stage.
    ///
    /// `on_phase` is called on entry to every phase after `ImageUploaded`,
    /// so callers can show progress.
    pub async fn run(
        &mut self,
        pipeline: &Pipeline,
        mut on_phase: impl FnMut(Phase),
    ) -> PipelineResult<GeneratedImageReference> {
        let image = match std::mem::take(&mut self.state) {
            InteractionState::ImageUploaded { image } => image,
            other => {
                self.state = other;
                return Err(self.invalid("generate"));
            }
        };

        self.enter(
            InteractionState::Describing {
                image: image.clone(),
            },
            &mut on_phase,
        );
        let description = match pipeline.describe(&image).await {
            Ok(description) => description,
            Err(error) => return Err(self.fail(image, error, &mut on_phase)),
        };

        self.enter(
            InteractionState::Generating {
                image: image.clone(),
                description: description.clone(),
            },
            &mut on_phase,
        );
        let result = match pipeline.generate(&image, &description).await {
            Ok(result) => result,
            Err(error) => return Err(self.fail(image, error, &mut on_phase)),
        };

        self.enter(
            InteractionState::Displayed {
                image,
                description,
                result: result.clone(),
            },
            &mut on_phase,
        );
        Ok(result)
    }

    /// Back to `Idle`, dropping the upload, description and result.
    pub fn retry(&mut self) {
        tracing::debug!(from = %self.phase(), "Interaction reset");
        self.state = InteractionState::Idle;
    }

    fn enter(&mut self, state: InteractionState, on_phase: &mut impl FnMut(Phase)) {
        let phase = state.phase();
        self.state = state;
        on_phase(phase);
    }

    fn fail(
        &mut self,
        image: UploadedImage,
        error: PipelineError,
        on_phase: &mut impl FnMut(Phase),
    ) -> PipelineError {
        self.enter(
            InteractionState::Error {
                image,
                error: error.clone(),
            },
            on_phase,
        );
        error
    }

    fn invalid(&self, action: &'static str) -> PipelineError {
        PipelineError::InvalidTransition {
            action,
            state: self.phase().as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::processor::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_happy_path_visits_every_phase() {
        let pipeline = pipeline(
            FakeDescriber::new(FakeDescription::Text("young man, smiling, glasses")),
            FakeGenerator::returning(&["https://x/out.png"]),
            0,
        );
        let mut interaction = Interaction::new();
        assert_eq!(interaction.phase(), Phase::Idle);

        interaction.upload(portrait()).unwrap();
        assert_eq!(interaction.phase(), Phase::ImageUploaded);

        let mut seen = Vec::new();
        let result = interaction
            .run(&pipeline, |phase| seen.push(phase))
            .await
            .unwrap();

        assert_eq!(
            seen,
            vec![Phase::Describing, Phase::Generating, Phase::Displayed]
        );
        assert_eq!(result.url(), "https://x/out.png");
        assert_eq!(interaction.phase(), Phase::Displayed);
        assert_eq!(
            interaction.description().map(|d| d.as_str()),
            Some("young man, smiling, glasses")
        );
        assert_eq!(interaction.result(), Some(&result));
    }

    #[tokio::test]
    async fn test_describe_failure_enters_error_without_generating() {
        let generator = FakeGenerator::returning(&["https://x/out.png"]);
        let pipeline = pipeline(
            FakeDescriber::new(FakeDescription::Http(401, "Unauthorized")),
            generator.clone(),
            0,
        );
        let mut interaction = Interaction::new();
        interaction.upload(portrait()).unwrap();

        let mut seen = Vec::new();
        let err = interaction
            .run(&pipeline, |phase| seen.push(phase))
            .await
            .unwrap_err();

        assert_eq!(seen, vec![Phase::Describing, Phase::Error]);
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(interaction.phase(), Phase::Error);
        assert!(interaction.result().is_none());
        assert!(interaction.description().is_none());
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_failure_enters_error_from_generating() {
        let pipeline = pipeline(
            FakeDescriber::new(FakeDescription::Text("a")),
            FakeGenerator::returning(&[]),
            0,
        );
        let mut interaction = Interaction::new();
        interaction.upload(portrait()).unwrap();

        let mut seen = Vec::new();
        let err = interaction
            .run(&pipeline, |phase| seen.push(phase))
            .await
            .unwrap_err();

        assert_eq!(seen, vec![Phase::Describing, Phase::Generating, Phase::Error]);
        assert!(matches!(err, PipelineError::EmptyOutput));
        assert!(matches!(
            interaction.error(),
            Some(PipelineError::EmptyOutput)
        ));
        assert!(interaction.result().is_none());
    }

    #[tokio::test]
    async fn test_retry_after_error_resets_everything() {
        let pipeline = pipeline(
            FakeDescriber::new(FakeDescription::Text("a")),
            FakeGenerator::failing("boom"),
            0,
        );
        let mut interaction = Interaction::new();
        interaction.upload(portrait()).unwrap();
        interaction.run(&pipeline, |_| {}).await.unwrap_err();
        assert_eq!(interaction.phase(), Phase::Error);

        interaction.retry();

        assert_eq!(interaction.phase(), Phase::Idle);
        assert!(interaction.uploaded_image().is_none());
        assert!(interaction.description().is_none());
        assert!(interaction.result().is_none());
        assert!(interaction.error().is_none());
    }

    #[tokio::test]
    async fn test_retry_after_display_allows_fresh_upload() {
        let pipeline = pipeline(
            FakeDescriber::new(FakeDescription::Text("a")),
            FakeGenerator::returning(&["https://x/out.png"]),
            0,
        );
        let mut interaction = Interaction::new();
        interaction.upload(portrait()).unwrap();
        interaction.run(&pipeline, |_| {}).await.unwrap();

        assert!(interaction.upload(portrait()).is_err());
        interaction.retry();
        assert!(interaction.upload(portrait()).is_ok());
        assert_eq!(interaction.phase(), Phase::ImageUploaded);
    }

    #[tokio::test]
    async fn test_run_without_upload_is_rejected() {
        let pipeline = pipeline(
            FakeDescriber::new(FakeDescription::Text("a")),
            FakeGenerator::returning(&["https://x/out.png"]),
            0,
        );
        let mut interaction = Interaction::new();

        let err = interaction.run(&pipeline, |_| {}).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidTransition { .. }));
        assert_eq!(err.to_string(), "Cannot generate while idle.");
        assert_eq!(interaction.phase(), Phase::Idle);
    }
}
