//! Artifact store and artifact plan configuration, with field-level validation.
//!
//! Each structure declares its fields once, in a static table ([`STORE_FIELDS`],
//! [`PLAN_FIELDS`]). Validation walks that table; the same table is what the
//! `metadata` command reports to the host.

use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// Static description of one configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldMetadata {
    pub key: &'static str,
    pub display_name: &'static str,
    pub required: bool,
    pub secure: bool,
}

pub const STORE_FIELDS: &[FieldMetadata] = &[
    FieldMetadata {
        key: "url",
        display_name: "WebDAV URL",
        required: true,
        secure: false,
    },
    FieldMetadata {
        key: "username",
        display_name: "Username",
        required: false,
        secure: false,
    },
    FieldMetadata {
        key: "password",
        display_name: "Password",
        required: false,
        secure: true,
    },
    FieldMetadata {
        key: "timeout_seconds",
        display_name: "Request timeout (seconds)",
        required: false,
        secure: false,
    },
];

pub const PLAN_FIELDS: &[FieldMetadata] = &[
    FieldMetadata {
        key: "source",
        display_name: "Source file or glob",
        required: true,
        secure: false,
    },
    FieldMetadata {
        key: "destination",
        display_name: "Destination folder",
        required: false,
        secure: false,
    },
];

/// A problem with a single configuration field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub key: String,
    pub message: String,
}

impl ValidationError {
    fn new(key: &str, message: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// The remote WebDAV endpoint and its credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct ArtifactStoreConfig {
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl fmt::Debug for ArtifactStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactStoreConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ArtifactStoreConfig {
    pub fn new(url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            url = %self.url,
            has_credentials = !self.username.is_empty(),
            timeout_seconds = self.timeout_seconds,
            "Loaded artifact store config"
        );
    }

    fn value_of(&self, key: &str) -> Option<String> {
        match key {
            "url" => Some(self.url.clone()),
            "username" => Some(self.username.clone()),
            "password" => Some(self.password.clone()),
            "timeout_seconds" => Some(self.timeout_seconds.to_string()),
            _ => None,
        }
    }
}

/// What to publish. Tagged by `type`; `webdav` is the only kind so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArtifactPlanConfig {
    Webdav(WebDavPlanConfig),
}

impl ArtifactPlanConfig {
    pub fn trace_loaded(&self) {
        match self {
            ArtifactPlanConfig::Webdav(plan) => {
                info!(
                    source = %plan.source,
                    destination = plan.target_folder(),
                    "Loaded WebDAV artifact plan"
                );
            }
        }
        debug!(?self, "Artifact plan loaded (full debug)");
    }

    fn value_of(&self, key: &str) -> Option<String> {
        match self {
            ArtifactPlanConfig::Webdav(plan) => match key {
                "source" => Some(plan.source.clone()),
                "destination" => Some(plan.destination.clone().unwrap_or_default()),
                _ => None,
            },
        }
    }
}

/// Source (literal path or glob) and optional destination folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebDavPlanConfig {
    pub source: String,
    #[serde(default)]
    pub destination: Option<String>,
}

impl WebDavPlanConfig {
    pub fn new(source: impl Into<String>, destination: Option<&str>) -> Self {
        Self {
            source: source.into(),
            destination: destination.map(str::to_string),
        }
    }

    /// The destination folder, or `""` when absent or blank.
    pub fn target_folder(&self) -> &str {
        self.destination
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
    }
}

/// Blank-check every required field of `fields`.
fn validate_required<F>(fields: &[FieldMetadata], value_of: F) -> Vec<ValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    fields
        .iter()
        .filter(|field| field.required)
        .filter(|field| {
            value_of(field.key)
                .map(|value| value.trim().is_empty())
                .unwrap_or(true)
        })
        .map(|field| ValidationError::new(field.key, format!("{} must not be blank.", field.key)))
        .collect()
}

/// Field-level problems with a store configuration; empty when valid.
pub fn validate_store(store: &ArtifactStoreConfig) -> Vec<ValidationError> {
    let mut errors = validate_required(STORE_FIELDS, |key| store.value_of(key));

    if !store.url.trim().is_empty() {
        match Url::parse(store.url.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "url",
                format!("url must use http or https, got `{}`.", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new("url", format!("url is not a valid URL: {e}."))),
        }
    }
    if store.timeout_seconds == 0 {
        errors.push(ValidationError::new(
            "timeout_seconds",
            "timeout_seconds must be greater than zero.",
        ));
    }
    errors
}

/// Field-level problems with a plan configuration; empty when valid.
pub fn validate_plan(plan: &ArtifactPlanConfig) -> Vec<ValidationError> {
    validate_required(PLAN_FIELDS, |key| plan.value_of(key))
}

pub fn store_config_metadata() -> &'static [FieldMetadata] {
    STORE_FIELDS
}

pub fn plan_config_metadata() -> &'static [FieldMetadata] {
    PLAN_FIELDS
}
