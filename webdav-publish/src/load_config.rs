/// `load_config` module: Loads a static YAML publish config and injects WebDAV credentials from the environment.
///
/// This module is the only place where untrusted YAML is parsed and mapped to the core's typed
/// configuration structures ([`ArtifactStoreConfig`], [`ArtifactPlanConfig`]).
///
/// # Responsibilities
/// - Parse the YAML file into the store and plan sections
/// - Inject `WEBDAV_USERNAME` / `WEBDAV_PASSWORD` so no secret has to live in the file
/// - Fail with a message that says which step went wrong (read, parse)
///
/// Field-level validation is not done here; see `webdav_publish_core::config::validate_store`
/// and `validate_plan`.
///
/// Accepted schema:
///
/// ```yaml
/// store:
///   url: https://dav.example.com/artifacts
///   timeout_seconds: 120   # optional
/// plan:
///   type: webdav
///   source: dist/*.zip
///   destination: releases  # optional
/// ```
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};
use webdav_publish_core::config::{ArtifactPlanConfig, ArtifactStoreConfig};

pub const USERNAME_ENV: &str = "WEBDAV_USERNAME";
pub const PASSWORD_ENV: &str = "WEBDAV_PASSWORD";

#[derive(Debug, Deserialize)]
pub struct PublishConfig {
    pub store: ArtifactStoreConfig,
    pub plan: ArtifactPlanConfig,
}

/// Loads a static YAML config file and injects credentials from the environment.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PublishConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let mut config: PublishConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if let Ok(username) = std::env::var(USERNAME_ENV) {
        info!("{USERNAME_ENV} found in env");
        config.store.username = username;
    }
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        info!("{PASSWORD_ENV} found in env");
        config.store.password = password;
    }

    config.store.trace_loaded();
    config.plan.trace_loaded();
    Ok(config)
}
