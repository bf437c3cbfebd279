//! State of the prompt form.
//!
//! The page template renders from [`FormState`] and `static/app.js` mirrors
//! the same transitions in the browser: a blank prompt never leaves the
//! form, and a submission holds the form disabled until it settles.

use chrono::{DateTime, Utc};

pub const VALIDATION_MESSAGE: &str = "Por favor ingresa una descripción";
pub const GENERATION_FALLBACK_MESSAGE: &str = "Error al generar la imagen";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub prompt: String,
    pub image_url: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

/// An in-flight submission. Settling consumes it, so each submission
/// re-enables the form exactly once.
#[derive(Debug)]
pub struct PendingGeneration {
    prompt: String,
}

impl PendingGeneration {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Anchor attributes for saving the current image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub href: String,
    pub filename: String,
}

impl FormState {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Whether the submit control is enabled: not loading and a non-blank
    /// prompt. `static/app.js` applies the same rule to the button.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.prompt.trim().is_empty()
    }

    /// Start a submission.
    ///
    /// Returns `None` without touching the network when a submission is
    /// already in flight, or when the prompt is blank (after recording the
    /// validation message).
    pub fn submit(&mut self) -> Option<PendingGeneration> {
        if !self.can_submit() {
            if !self.loading {
                self.error = Some(VALIDATION_MESSAGE.to_string());
            }
            return None;
        }

        self.loading = true;
        self.error = None;
        self.image_url = None;

        Some(PendingGeneration {
            prompt: self.prompt.clone(),
        })
    }

    /// Finish a submission with the relay's image URL or error text.
    pub fn settle(&mut self, _pending: PendingGeneration, outcome: Result<String, String>) {
        match outcome {
            Ok(url) => self.image_url = Some(url),
            Err(message) if message.trim().is_empty() => {
                self.error = Some(GENERATION_FALLBACK_MESSAGE.to_string())
            }
            Err(message) => self.error = Some(message),
        }

        self.loading = false;
    }

    pub fn download_link(&self, now: DateTime<Utc>) -> Option<DownloadLink> {
        self.image_url.as_ref().map(|url| DownloadLink {
            href: url.clone(),
            filename: format!("imagen-{}.png", now.timestamp_millis()),
        })
    }
}
