//! OpenAI description backend using the Chat Completions API.
//!
//! Sends the portrait via data URL in the user message content array.

use super::{Describer, DESCRIPTION_PROMPT};
use crate::config::DescriptionConfig;
use crate::error::PipelineError;
use crate::types::{DescriptionResult, UploadedImage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Describer backed by an OpenAI-compatible chat completion endpoint.
pub struct OpenAiDescriber {
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiDescriber {
    pub fn new(api_key: &str, config: &DescriptionConfig, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            max_tokens: config.max_tokens,
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ChatContent<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent<'a> {
    #[serde(rename = "text")]
    Text { text: &'a str },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl Describer for OpenAiDescriber {
    fn name(&self) -> &str {
        "openai"
    }

    async fn describe(&self, image: &UploadedImage) -> Result<DescriptionResult, PipelineError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ChatContent::Text {
                        text: DESCRIPTION_PROMPT,
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PipelineError::DescriptionTransport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| PipelineError::DescriptionTransport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!("Description API returned HTTP {status}");
            return Err(PipelineError::DescriptionHttp {
                status: status.as_u16(),
                body: text,
            });
        }

        let chat_resp: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!("Unparseable description response: {e}");
            PipelineError::NoDescription
        })?;

        let content = chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(PipelineError::NoDescription)?;

        tracing::debug!(
            model = %self.model,
            latency_ms = start.elapsed().as_millis() as u64,
            "Description received"
        );

        Ok(DescriptionResult::new(content))
    }
}
