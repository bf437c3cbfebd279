use crate::images::RemotePattern;
use serde::Deserialize;
use service_core::config::{self as core_config, ServerConfig};
use service_core::error::AppError;
use std::path::PathBuf;

pub const SERVICE_NAME: &str = "imagegen-service";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub provider: ProviderSettings,
    #[serde(default)]
    pub assets: AssetSettings,
    #[serde(default)]
    pub images: ImageSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderSettings {
    /// Scheme and host of the image generation API, without the
    /// `/v1/image/generate` path (e.g. https://api.nanobanana.pro).
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetSettings {
    /// Directory served under `/static`. Relative paths are resolved against
    /// the service crate directory.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
        }
    }
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

/// Remote hosts the page may render images from.
#[derive(Debug, Deserialize, Clone)]
pub struct ImageSettings {
    #[serde(default = "default_remote_patterns")]
    pub remote_patterns: Vec<RemotePattern>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            remote_patterns: default_remote_patterns(),
        }
    }
}

fn default_remote_patterns() -> Vec<RemotePattern> {
    vec![
        RemotePattern::new("https", "**.nanobanana.pro"),
        RemotePattern::new("https", "api.nanobanana.pro"),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC collector (e.g. http://tempo:4317). Span export is off when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let service_directory = core_config::service_directory(SERVICE_NAME)?;
    let mut settings: Settings = core_config::load_settings(&service_directory.join("config"))?;

    if settings.assets.static_dir.is_relative() {
        settings.assets.static_dir = service_directory.join(&settings.assets.static_dir);
    }

    Ok(settings)
}
