//! Test helpers for imagegen-service integration tests.

#![allow(dead_code)]

use axum::{body::Body, response::Response, Router};
use imagegen_service::config::{
    AssetSettings, ImageSettings, ProviderSettings, Settings, TelemetrySettings,
};
use imagegen_service::images::ImageHostPolicy;
use imagegen_service::services::providers::ImageProvider;
use imagegen_service::startup::{build_router, Application};
use imagegen_service::AppState;
use service_core::config::ServerConfig;
use std::path::PathBuf;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn post_generate(&self, body: impl Into<reqwest::Body>) -> reqwest::Response {
        self.client
            .post(format!("{}/api/generate", self.address))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to send request")
    }
}

pub fn test_settings(provider_base_url: &str) -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        provider: ProviderSettings {
            base_url: provider_base_url.to_string(),
        },
        assets: AssetSettings {
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
        },
        images: ImageSettings::default(),
        telemetry: TelemetrySettings::default(),
    }
}

/// Spawn the real application, talking to `provider_base_url`, on a random port.
pub async fn spawn_app(provider_base_url: &str) -> TestApp {
    let app = Application::build(test_settings(provider_base_url))
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", app.port());

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    TestApp {
        address,
        client: reqwest::Client::new(),
    }
}

/// In-process router around `provider`, for `oneshot` tests.
pub fn router_with(provider: Arc<dyn ImageProvider>) -> Router {
    let settings = test_settings("http://unused.invalid");
    let state = AppState::new(
        provider,
        ImageHostPolicy::new(settings.images.remote_patterns.clone()),
    );
    build_router(state, &settings.assets).expect("Failed to build router")
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}
