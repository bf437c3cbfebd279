//! Application startup and lifecycle management.

use crate::config::{AssetSettings, Settings};
use crate::handlers::{
    app::{health_check, metrics, readiness_check},
    generate::generate_image,
    page::{index, submit_form},
};
use crate::images::ImageHostPolicy;
use crate::services::providers::nano_banana::NanoBananaProvider;
use crate::services::providers::ImageProvider;
use crate::AppState;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::{security_headers_middleware, SecurityHeaders},
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Content-Security-Policy for the HTML page; `img-src` comes from the
/// image-host allow-list.
pub fn page_content_security_policy(image_hosts: &ImageHostPolicy) -> String {
    format!(
        "default-src 'self'; script-src 'self'; style-src 'self'; img-src {}; \
         connect-src 'self'; form-action 'self'; frame-ancestors 'none'",
        image_hosts.csp_img_src()
    )
}

pub fn build_router(state: AppState, assets: &AssetSettings) -> Result<Router, AppError> {
    let security_headers = SecurityHeaders::new(&page_content_security_policy(&state.image_hosts))
        .map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Image host patterns produce an invalid Content-Security-Policy: {}",
                e
            ))
        })?;

    let router = Router::new()
        .route("/", get(index).post(submit_form))
        .route("/api/generate", post(generate_image))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .nest_service("/static", ServeDir::new(&assets.static_dir))
        .layer(from_fn_with_state(
            Arc::new(security_headers),
            security_headers_middleware,
        ))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state);

    Ok(router)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the Nano Banana Pro provider.
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let provider = NanoBananaProvider::new(&settings.provider).map_err(|e| {
            tracing::error!("Failed to initialize image provider: {}", e);
            AppError::InternalError(anyhow::anyhow!("Image provider error: {}", e))
        })?;

        tracing::info!(
            endpoint = %provider.endpoint(),
            "Initialized Nano Banana Pro provider"
        );

        Self::build_with_provider(settings, Arc::new(provider)).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        settings: Settings,
        provider: Arc<dyn ImageProvider>,
    ) -> Result<Self, AppError> {
        let image_hosts = ImageHostPolicy::new(settings.images.remote_patterns.clone());
        let state = AppState::new(provider, image_hosts);
        let router = build_router(state, &settings.assets)?;

        // Port 0 = random port for testing
        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!("imagegen-service listening on port {}", self.port);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
