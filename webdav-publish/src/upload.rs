#![doc = "WebDAV client for CLI and core: implements the core `WebDavClient` contract over reqwest with basic authentication."]
//
//! # WebDAV transport
//!
//! [`WebDavHttpClient`] is the production [`WebDavClient`]: it sends `MKCOL` and
//! streamed `PUT` requests to the artifact store and hands the raw status code
//! back to the core pipeline, which decides what counts as success.
//!
//! - Construct it from an [`ArtifactStoreConfig`]; credentials are only sent when
//!   a username is configured.
//! - Every request is bounded by the store's `timeout_seconds`. A timed-out
//!   request surfaces as a transport error and fails the publish like any other.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, Client, Method, RequestBuilder, StatusCode};
use tokio_util::io::ReaderStream;

use webdav_publish_core::config::ArtifactStoreConfig;
use webdav_publish_core::contract::{TransportError, WebDavClient};

pub struct WebDavHttpClient {
    client: Client,
    username: String,
    password: String,
}

impl WebDavHttpClient {
    pub fn new(store: &ArtifactStoreConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(store.timeout_seconds))
            .build()
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to build HTTP client");
                e
            })?;
        tracing::info!(
            url = %store.url,
            authenticated = !store.username.is_empty(),
            timeout_seconds = store.timeout_seconds,
            "Initialized WebDAV client"
        );
        Ok(Self {
            client,
            username: store.username.clone(),
            password: store.password.clone(),
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        if self.username.is_empty() {
            builder
        } else {
            builder.basic_auth(&self.username, Some(&self.password))
        }
    }
}

#[async_trait]
impl WebDavClient for WebDavHttpClient {
    async fn make_collection(&self, url: &str) -> Result<StatusCode, TransportError> {
        let method = Method::from_bytes(b"MKCOL")?;
        tracing::debug!(url, "Sending MKCOL");
        match self.request(method, url).send().await {
            Ok(response) => {
                tracing::debug!(url, status = %response.status(), "MKCOL answered");
                Ok(response.status())
            }
            Err(e) => {
                tracing::error!(error = ?e, url, "MKCOL request failed");
                Err(Box::new(e))
            }
        }
    }

    async fn put_file(&self, url: &str, local_path: &Path) -> Result<StatusCode, TransportError> {
        let file = tokio::fs::File::open(local_path).await.map_err(|e| {
            tracing::error!(error = ?e, local = %local_path.display(), "Failed to open file for upload");
            e
        })?;
        let length = file.metadata().await?.len();
        tracing::debug!(url, local = %local_path.display(), bytes = length, "Sending PUT");

        let response = self
            .request(Method::PUT, url)
            .header(CONTENT_LENGTH, length)
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await;

        match response {
            Ok(response) => {
                tracing::debug!(url, status = %response.status(), "PUT answered");
                Ok(response.status())
            }
            Err(e) => {
                tracing::error!(error = ?e, url, "PUT request failed");
                Err(Box::new(e))
            }
        }
    }
}
