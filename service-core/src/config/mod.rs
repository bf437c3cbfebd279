use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::{Deserialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Resolve the crate directory of `service_name`, whether the process was
/// started from the workspace root or from inside the crate.
pub fn service_directory(service_name: &str) -> Result<PathBuf, AppError> {
    let base_path = std::env::current_dir().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "Failed to determine the current directory: {}",
            e
        ))
    })?;

    if base_path.ends_with(service_name) {
        Ok(base_path)
    } else {
        Ok(base_path.join(service_name))
    }
}

/// Load `base.yaml` from `configuration_directory`, then apply `APP__`
/// environment overrides (`APP__SERVER__PORT=0`).
pub fn load_settings<T: DeserializeOwned>(configuration_directory: &Path) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let settings = Cfg::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
