//! Description stage: portrait in, short comma-separated attribute list out.
//!
//! The stage sends the upload to a hosted multimodal model together with a
//! fixed instruction prompt and hands back the first completion verbatim.

mod openai;

pub use openai::OpenAiDescriber;

use crate::error::PipelineError;
use crate::types::{DescriptionResult, UploadedImage};
use async_trait::async_trait;

/// Instruction sent alongside every portrait.
pub const DESCRIPTION_PROMPT: &str = "Describe this person in the image, their age, gender, \
hair color, facial expression, and other characteristics, ie facial hair, glasses, or piercings. \
Also specify the vibe of the photo and the setting using the same brief format. \
Don't output any other punctuation other than commas. \
Here is an example output for you: young man, neutral face, light beard, glasses, black hair, \
warehouse, dark, black and white\n \
Here is another example for you: young girl, smiling face, glasses, blonde hair, colorful \
background, happy mood\nbe EXTREMELY concise.";

/// Trait that every description backend implements.
///
/// Uses `async_trait` because the pipeline holds `Arc<dyn Describer>`.
#[async_trait]
pub trait Describer: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Produce a short attribute list for the uploaded portrait.
    async fn describe(&self, image: &UploadedImage) -> Result<DescriptionResult, PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_demands_comma_format() {
        assert!(DESCRIPTION_PROMPT.contains("other than commas"));
        assert!(DESCRIPTION_PROMPT.contains("young man, neutral face, light beard"));
        assert!(DESCRIPTION_PROMPT.ends_with("be EXTREMELY concise."));
    }
}
