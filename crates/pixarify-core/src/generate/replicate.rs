//! Replicate generation backend.
//!
//! Creates a prediction for the configured model version, then polls its
//! `urls.get` endpoint until it settles.

use super::{GenerationModel, GenerationRequest, Generator};
use crate::error::PipelineError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Generator that runs a [`GenerationModel`] preset on Replicate.
#[derive(Clone)]
pub struct ReplicateGenerator {
    client: Client,
    api_token: String,
    endpoint: String,
    model: GenerationModel,
    poll_interval: Duration,
    timeout: Duration,
}

impl ReplicateGenerator {
    pub fn new(
        api_token: &str,
        endpoint: &str,
        model: GenerationModel,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::new(),
            api_token: api_token.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model,
            poll_interval,
            timeout,
        }
    }

    async fn run_prediction(&self, request: &GenerationRequest) -> Result<Vec<String>, String> {
        // 1. Create prediction
        let create_resp = self
            .client
            .post(format!("{}/predictions", self.endpoint))
            .bearer_auth(&self.api_token)
            .json(&json!({
                "version": self.model.version(),
                "input": self.model.input(request),
            }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = create_resp.status();
        let body = create_resp.text().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            return Err(format!("Prediction request error: {status} - {body}"));
        }

        let mut prediction: Prediction =
            serde_json::from_str(&body).map_err(|e| format!("Unexpected prediction: {e}"))?;
        let poll_url = prediction
            .urls
            .as_ref()
            .and_then(|u| u.get.clone())
            .ok_or_else(|| format!("Missing prediction get URL: {body}"))?;

        // 2. Poll until finished
        loop {
            match prediction.status.as_str() {
                "succeeded" => return Ok(prediction.output_locators()),
                "failed" | "canceled" => {
                    let reason = prediction
                        .error
                        .as_ref()
                        .map(value_text)
                        .unwrap_or_else(|| format!("prediction {}", prediction.status));
                    return Err(reason);
                }
                other => {
                    tracing::trace!(status = other, "Prediction pending");
                    sleep(self.poll_interval).await;
                }
            }

            prediction = self
                .client
                .get(&poll_url)
                .bearer_auth(&self.api_token)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| e.to_string())?
                .json::<Prediction>()
                .await
                .map_err(|e| e.to_string())?;
        }
    }
}

#[derive(Debug, Deserialize)]
struct Prediction {
    status: String,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: Option<String>,
}

impl Prediction {
    /// Output as a list of locators; a bare string counts as a one-element list.
    fn output_locators(&self) -> Vec<String> {
        match &self.output {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(url)) => vec![url.clone()],
            _ => Vec::new(),
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Generator for ReplicateGenerator {
    fn name(&self) -> &str {
        "replicate"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, PipelineError> {
        let start = Instant::now();

        let outputs = tokio::time::timeout(self.timeout, self.run_prediction(request))
            .await
            .map_err(|_| {
                PipelineError::Generation(format!(
                    "timed out after {}ms",
                    self.timeout.as_millis()
                ))
            })?
            .map_err(PipelineError::Generation)?;

        tracing::debug!(
            model = %self.model,
            outputs = outputs.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Generation finished"
        );

        Ok(outputs)
    }
}
