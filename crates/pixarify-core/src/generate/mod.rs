//! Generation stage: description (plus the source portrait) in, output
//! locators out.
//!
//! Two hosted model presets are supported. Each fixes its own prompt
//! template and parameter set; which one runs, and which element of its
//! output list is shown, are configuration decisions.

mod replicate;

pub use replicate::ReplicateGenerator;

use crate::error::PipelineError;
use crate::types::{DescriptionResult, UploadedImage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Hosted style-transfer model presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GenerationModel {
    /// `tencentarc/photomaker-style`: identity-preserving stylization.
    #[default]
    #[serde(rename = "photomaker-style")]
    PhotomakerStyle,
    /// `adirik/t2i-adapter-sdxl-depth-midas`: depth-conditioned SDXL.
    #[serde(rename = "t2i-adapter-sdxl-depth-midas")]
    T2iAdapterDepth,
}

impl GenerationModel {
    pub const ALL: [GenerationModel; 2] = [
        GenerationModel::PhotomakerStyle,
        GenerationModel::T2iAdapterDepth,
    ];

    /// Replicate model version id.
    pub fn version(&self) -> &'static str {
        match self {
            GenerationModel::PhotomakerStyle => {
                "467d062309da518648ba89d226490e02b8ed09b5abc15026e54e31c5a8cd0769"
            }
            GenerationModel::T2iAdapterDepth => {
                "8a89b0ab59a050244a751b6475d91041a8582ba33692ae6fab65e0c51b700328"
            }
        }
    }

    /// Owner/name of the hosted model.
    pub fn slug(&self) -> &'static str {
        match self {
            GenerationModel::PhotomakerStyle => "tencentarc/photomaker-style",
            GenerationModel::T2iAdapterDepth => "adirik/t2i-adapter-sdxl-depth-midas",
        }
    }

    /// Number of locators a successful run yields.
    pub fn output_count(&self) -> usize {
        match self {
            GenerationModel::PhotomakerStyle => 1,
            GenerationModel::T2iAdapterDepth => 2,
        }
    }

    /// Interpolate the description into this model's prompt template.
    pub fn prompt(&self, description: &DescriptionResult) -> String {
        match self {
            GenerationModel::PhotomakerStyle => format!(
                "a Pixar character, {description} img, 3d CGI, art by Pixar, half-body, \
                 screenshot from animation"
            ),
            GenerationModel::T2iAdapterDepth => {
                format!("a Pixar character, {description}, 2022 Pixar style")
            }
        }
    }

    /// Full model input: prompt, source image and the fixed parameter set.
    pub fn input(&self, request: &GenerationRequest) -> serde_json::Value {
        let prompt = self.prompt(&request.description);
        let image = request.image.data_url();
        match self {
            GenerationModel::PhotomakerStyle => json!({
                "prompt": prompt,
                "num_steps": 75,
                "style_name": "(No style)",
                "input_image": image,
                "num_outputs": 1,
                "guidance_scale": 5,
                "negative_prompt": "realistic, photo-realistic, worst quality, greyscale, bad anatomy, bad hands, error, text",
                "style_strength_ratio": 35,
            }),
            GenerationModel::T2iAdapterDepth => json!({
                "image": image,
                "prompt": prompt,
                "scheduler": "K_EULER_ANCESTRAL",
                "num_samples": 1,
                "random_seed": 1001,
                "guidance_scale": 9,
                "negative_prompt": "graphic, deformed, mutated, ugly, disfigured, photorealistic, photo",
                "num_inference_steps": 100,
                "adapter_conditioning_scale": 0.66,
                "adapter_conditioning_factor": 1,
            }),
        }
    }
}

impl fmt::Display for GenerationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationModel::PhotomakerStyle => write!(f, "photomaker-style"),
            GenerationModel::T2iAdapterDepth => write!(f, "t2i-adapter-sdxl-depth-midas"),
        }
    }
}

impl FromStr for GenerationModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.to_string() == s || m.slug() == s)
            .ok_or_else(|| {
                format!("unknown generation model '{s}' (expected photomaker-style or t2i-adapter-sdxl-depth-midas)")
            })
    }
}

/// Everything the generation stage receives from the rest of the pipeline.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Description produced by the description stage, passed verbatim
    pub description: DescriptionResult,
    /// The original upload
    pub image: UploadedImage,
}

/// Trait that every generation backend implements.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Run the hosted model and return its output locators in order.
    ///
    /// An empty list is a valid answer; the pipeline decides what to show.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, PipelineError>;
}
