//! # contract: seams between the publish pipeline and the outside world
//!
//! The pipeline never talks HTTP or writes log lines to the host itself. It goes
//! through the two traits defined here:
//!
//! - [`WebDavClient`]: the two WebDAV verbs the pipeline needs, `MKCOL` and `PUT`.
//!   Implementations return the raw status code; the pipeline decides what counts
//!   as success (e.g. `405` on `MKCOL` means the collection already exists).
//! - [`Console`]: the operator-facing log sink (`info` / `error`).
//!
//! ## Mocking & Testing
//! Both traits are annotated for `mockall`; with the `test-export-mocks` feature
//! (on by default) `MockWebDavClient` and `MockConsole` are exported for use by
//! dependent crates' tests.

#![allow(unused)]

use std::path::Path;

use async_trait::async_trait;
use mockall::{automock, predicate::*};
use reqwest::StatusCode;

/// Network-level failure reported by a [`WebDavClient`] (connection refused,
/// timeout, unreadable local file, ...). Non-success HTTP statuses are not
/// transport errors; they are returned as `Ok(status)`.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Minimal WebDAV client used by the pipeline.
///
/// Implementors own authentication and transport details. Every call is a single
/// request; retries, if any, are the implementor's business.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait WebDavClient: Send + Sync {
    /// Issue `MKCOL` for the collection at `url`.
    async fn make_collection(&self, url: &str) -> Result<StatusCode, TransportError>;

    /// Issue `PUT` to `url` with the contents of `local_path` as the body.
    async fn put_file(&self, url: &str, local_path: &Path) -> Result<StatusCode, TransportError>;
}

/// Operator-facing log sink. The pipeline reports progress and failures here;
/// it owns no lifecycle over the sink.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Console: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}
