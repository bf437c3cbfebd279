//! Nano Banana Pro image provider.
//!
//! One `POST /v1/image/generate` per call, no retries and the HTTP client's
//! default timeout.

use super::{extract_image_url, GeneratedImage, GenerationParams, ImageProvider, ProviderError};
use crate::config::ProviderSettings;
use crate::services::metrics;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use service_core::observability::TracedClientExt;
use std::time::Instant;

const GENERATE_PATH: &str = "/v1/image/generate";

/// Message used when an error response carries no usable `message`.
pub const UPSTREAM_FALLBACK_MESSAGE: &str = "Failed to generate image";

#[derive(Debug, Serialize)]
struct GenerateImageRequest<'a> {
    prompt: &'a str,
    #[serde(flatten)]
    params: GenerationParams,
}

/// Nano Banana Pro provider.
pub struct NanoBananaProvider {
    client: Client,
    endpoint: String,
}

impl NanoBananaProvider {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("imagegen-service/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", settings.base_url.trim_end_matches('/'), GENERATE_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageProvider for NanoBananaProvider {
    fn name(&self) -> &'static str {
        "nano_banana"
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let request = GenerateImageRequest {
            prompt,
            params: GenerationParams::FIXED,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            prompt_len = prompt.len(),
            "Sending request to Nano Banana Pro API"
        );

        let started = Instant::now();
        let response = self
            .client
            .traced_post(&self.endpoint)
            .header("accept", "application/json")
            .json(&request)
            .send()
            .await;
        metrics::record_provider_latency(self.name(), started.elapsed().as_secs_f64());

        let response = response.map_err(|e| ProviderError::Network(e.to_string()))?;
        let status = response.status();

        if !status.is_success() {
            // Error bodies are best effort; anything unparseable counts as empty.
            let body: Value = response.json().await.unwrap_or(Value::Null);
            tracing::error!(status = %status, body = %body, "Nano Banana Pro API error");

            let message = body
                .get("message")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .unwrap_or(UPSTREAM_FALLBACK_MESSAGE)
                .to_string();

            return Err(ProviderError::Upstream { status, message });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        match extract_image_url(&body) {
            Some(url) => Ok(GeneratedImage {
                url: url.to_string(),
            }),
            None => {
                tracing::error!(body = %body, "No image URL in response");
                Err(ProviderError::MissingImageUrl)
            }
        }
    }
}
