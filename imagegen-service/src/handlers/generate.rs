use crate::error::GenerateError;
use crate::services::{metrics, relay_prompt};
use crate::AppState;
use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub image_url: String,
}

/// `POST /api/generate`: relay `{"prompt": "..."}` to the image provider.
///
/// The body is read as raw bytes so a missing or wrong `content-type` does
/// not change the outcome; malformed JSON is an internal error, while a
/// missing, empty or non-string `prompt` is a 400. A body that parses but is
/// not an object (`null`, `[]`, `"x"`) has no `prompt` and is also a 400.
pub async fn generate_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, GenerateError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse generate request body");
        metrics::record_generation("internal_error");
        GenerateError::internal(e.to_string())
    })?;

    let prompt = match payload.get("prompt").and_then(Value::as_str) {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => {
            tracing::warn!("Generate request without a prompt");
            metrics::record_generation(GenerateError::InvalidInput.outcome());
            return Err(GenerateError::InvalidInput);
        }
    };

    let image = relay_prompt(state.provider.as_ref(), prompt).await?;

    Ok(Json(GenerateResponse {
        image_url: image.url,
    }))
}
