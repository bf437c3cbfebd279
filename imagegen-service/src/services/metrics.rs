//! Prometheus metrics for imagegen-service.
//!
//! HTTP request metrics come from `service_core::middleware::metrics`; this
//! module adds relay outcome and provider latency.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Call once at startup.
pub fn init_metrics() {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if METRICS_HANDLE.set(handle).is_err() {
                tracing::warn!("Metrics handle already initialized");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Failed to install Prometheus recorder"),
    }
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count a relay attempt by outcome (`success`, `invalid_input`, `upstream_error`, ...).
pub fn record_generation(outcome: &'static str) {
    counter!("image_generations_total", "outcome" => outcome).increment(1);
}

pub fn record_provider_latency(provider: &'static str, seconds: f64) {
    histogram!("image_provider_latency_seconds", "provider" => provider).record(seconds);
}
