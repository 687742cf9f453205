//! The portrait pipeline.
//!
//! - **intake**: Accept an upload (extension and size checks only)
//! - **processor**: Run description then generation, select the output
//! - **interaction**: Per-user state machine around one pipeline run

pub mod intake;
pub mod interaction;
pub mod processor;

// Re-exports for convenient access
pub use intake::Intake;
pub use interaction::{Interaction, InteractionState, Phase};
pub use processor::{Pipeline, PipelineOutput};
