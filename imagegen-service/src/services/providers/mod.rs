//! Image generation provider abstractions and implementations.
//!
//! The relay talks to providers through [`ImageProvider`] so the HTTP
//! handlers do not depend on a particular backend (Nano Banana Pro, mock).

pub mod mock;
pub mod nano_banana;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Response fields that may carry the generated image URL, in priority order.
pub const IMAGE_URL_FIELDS: [&str; 3] = ["image_url", "imageUrl", "url"];

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// The provider answered successfully but without a usable image URL.
    #[error("No image URL returned from API")]
    MissingImageUrl,

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    InvalidResponse(String),
}

/// Generation parameters sent with every request. They are fixed and never
/// derived from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationParams {
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub guidance: u32,
}

impl GenerationParams {
    pub const FIXED: GenerationParams = GenerationParams {
        width: 1024,
        height: 1024,
        steps: 4,
        guidance: 2,
    };
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::FIXED
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
}

/// Trait for prompt-to-image providers.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Short provider name for logs and metric labels.
    fn name(&self) -> &'static str;

    /// Issue exactly one generation request for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError>;
}

/// Pick the first of [`IMAGE_URL_FIELDS`] holding a non-empty string.
///
/// The provider's schema has used all three names; keep the order stable
/// until the authoritative field is confirmed.
pub fn extract_image_url(body: &Value) -> Option<&str> {
    IMAGE_URL_FIELDS
        .iter()
        .filter_map(|field| body.get(field).and_then(Value::as_str))
        .find(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_image_url_over_other_aliases() {
        let body = json!({"url": "c", "imageUrl": "b", "image_url": "a"});
        assert_eq!(extract_image_url(&body), Some("a"));
    }

    #[test]
    fn prefers_camel_case_over_plain_url() {
        let body = json!({"imageUrl": "b", "url": "c"});
        assert_eq!(extract_image_url(&body), Some("b"));
    }

    #[test]
    fn skips_empty_and_non_string_fields() {
        let body = json!({"image_url": "", "imageUrl": 42, "url": "c"});
        assert_eq!(extract_image_url(&body), Some("c"));
    }

    #[test]
    fn none_when_no_alias_present() {
        assert_eq!(extract_image_url(&json!({"data": []})), None);
        assert_eq!(extract_image_url(&json!(["image_url"])), None);
    }

    #[test]
    fn fixed_params_serialize_as_integers() {
        let value = serde_json::to_value(GenerationParams::default()).unwrap();
        assert_eq!(
            value,
            json!({"width": 1024, "height": 1024, "steps": 4, "guidance": 2})
        );
    }
}
