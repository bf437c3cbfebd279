pub mod config;
pub mod error;
pub mod handlers;
pub mod images;
pub mod services;
pub mod startup;
pub mod ui;

use images::ImageHostPolicy;
use services::providers::ImageProvider;
use std::sync::Arc;

/// Shared application state. Immutable after startup; every request reads
/// it without locking.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ImageProvider>,
    pub image_hosts: Arc<ImageHostPolicy>,
}

impl AppState {
    pub fn new(provider: Arc<dyn ImageProvider>, image_hosts: ImageHostPolicy) -> Self {
        Self {
            provider,
            image_hosts: Arc::new(image_hosts),
        }
    }
}
