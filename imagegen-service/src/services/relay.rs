//! Prompt relay shared by the JSON endpoint and the form page.

use super::metrics;
use super::providers::{GeneratedImage, ImageProvider};
use crate::error::GenerateError;

/// Forward `prompt` to `provider` once and classify the result.
///
/// The prompt is passed through unchanged; callers decide what counts as
/// a valid prompt.
pub async fn relay_prompt(
    provider: &dyn ImageProvider,
    prompt: &str,
) -> Result<GeneratedImage, GenerateError> {
    match provider.generate(prompt).await {
        Ok(image) => {
            tracing::info!(provider = provider.name(), "Image generated");
            metrics::record_generation("success");
            Ok(image)
        }
        Err(e) => {
            let err = GenerateError::from(e);
            match &err {
                GenerateError::Upstream { status, .. } => tracing::warn!(
                    provider = provider.name(),
                    status = %status,
                    error = %err,
                    "Image provider rejected request"
                ),
                _ => tracing::error!(
                    provider = provider.name(),
                    error = %err,
                    "Error generating image"
                ),
            }
            metrics::record_generation(err.outcome());
            Err(err)
        }
    }
}
