//! Mock provider for testing.

use super::{GeneratedImage, ImageProvider, ProviderError};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Outcome the mock returns on every call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Image(String),
    Upstream(StatusCode, String),
    MissingImageUrl,
    Network(String),
}

/// Mock image provider that records the prompts it receives.
pub struct MockImageProvider {
    outcome: MockOutcome,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockImageProvider {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn returning_image(url: &str) -> Self {
        Self::new(MockOutcome::Image(url.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.outcome {
            MockOutcome::Image(url) => Ok(GeneratedImage { url: url.clone() }),
            MockOutcome::Upstream(status, message) => Err(ProviderError::Upstream {
                status: *status,
                message: message.clone(),
            }),
            MockOutcome::MissingImageUrl => Err(ProviderError::MissingImageUrl),
            MockOutcome::Network(message) => Err(ProviderError::Network(message.clone())),
        }
    }
}
