use serial_test::serial;
use std::env;
use std::fs::write;
use tempfile::NamedTempFile;
use webdav_publish::load_config::{load_config, PASSWORD_ENV, USERNAME_ENV};
use webdav_publish_core::config::{ArtifactPlanConfig, DEFAULT_TIMEOUT_SECONDS};

fn config_file(yaml: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), yaml).expect("write temp config");
    file
}

/// A static config plus credentials from the environment produce a complete store config.
#[test]
#[serial]
fn load_config_merges_file_and_env_credentials() {
    let file = config_file(
        r#"
store:
  url: https://dav.example.com/artifacts
  timeout_seconds: 60
plan:
  type: webdav
  source: "dist/*.zip"
  destination: releases
"#,
    );
    env::set_var(USERNAME_ENV, "ci");
    env::set_var(PASSWORD_ENV, "secret");

    let config = load_config(file.path()).expect("Config should load");

    assert_eq!(config.store.url, "https://dav.example.com/artifacts");
    assert_eq!(config.store.username, "ci");
    assert_eq!(config.store.password, "secret");
    assert_eq!(config.store.timeout_seconds, 60);
    let ArtifactPlanConfig::Webdav(plan) = &config.plan;
    assert_eq!(plan.source, "dist/*.zip");
    assert_eq!(plan.target_folder(), "releases");

    env::remove_var(USERNAME_ENV);
    env::remove_var(PASSWORD_ENV);
}

/// Credentials and destination are optional; the timeout falls back to its default.
#[test]
#[serial]
fn load_config_allows_anonymous_store_without_destination() {
    env::remove_var(USERNAME_ENV);
    env::remove_var(PASSWORD_ENV);
    let file = config_file(
        r#"
store:
  url: http://localhost:8080/dav
plan:
  type: webdav
  source: build/out.jar
"#,
    );

    let config = load_config(file.path()).expect("Config should load");

    assert!(config.store.username.is_empty());
    assert!(config.store.password.is_empty());
    assert_eq!(config.store.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    let ArtifactPlanConfig::Webdav(plan) = &config.plan;
    assert_eq!(plan.destination, None);
}

#[test]
#[serial]
fn load_config_errors_for_unknown_plan_type() {
    let file = config_file(
        r#"
store:
  url: https://dav.example.com
plan:
  type: s3
  source: x
"#,
    );

    let err = load_config(file.path()).unwrap_err();

    assert!(err.to_string().contains("parse"), "got: {err}");
}

#[test]
#[serial]
fn load_config_errors_for_invalid_file() {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), b"not-yaml: [:::").unwrap();

    let msg = load_config(file.path()).unwrap_err().to_string();

    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn load_config_errors_for_missing_file() {
    let msg = load_config("definitely/not/here.yaml").unwrap_err().to_string();

    assert!(msg.contains("Failed to read config file"), "got: {msg}");
}
