//! Error taxonomy for the publish pipeline.
//!
//! Each stage has its own error type so callers can tell a local filesystem
//! problem ([`ResolutionError`]) apart from a remote collection failure
//! ([`EnsureError`]) or a failed transfer ([`UploadError`]). The orchestrator
//! wraps whichever one occurred in a [`PublishError`] carrying the source
//! specification and remote URL.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::contract::TransportError;
use crate::uploader::UploadOutcome;

/// Resolving a source specification against the working directory failed.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to walk `{}`: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Creating a remote collection failed.
#[derive(Debug, Error)]
pub enum EnsureError {
    #[error("MKCOL `{path}` returned status {status}")]
    Status { path: String, status: StatusCode },

    #[error("MKCOL `{path}` failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: TransportError,
    },
}

impl EnsureError {
    /// Remote path of the collection that could not be created.
    pub fn path(&self) -> &str {
        match self {
            EnsureError::Status { path, .. } | EnsureError::Transport { path, .. } => path,
        }
    }
}

/// Transferring a file (or preparing a directory for transfer) failed.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("PUT `{path}` returned status {status}")]
    Status { path: String, status: StatusCode },

    #[error("PUT `{path}` failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: TransportError,
    },

    #[error("failed to read local directory `{}`: {source}", local.display())]
    Io {
        local: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Collection(#[from] EnsureError),
}

impl UploadError {
    /// Status code returned by the server, if the failure was a rejected request.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UploadError::Status { status, .. } => Some(*status),
            UploadError::Collection(EnsureError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// The stage of a publish at which it failed.
#[derive(Debug, Error)]
pub enum PublishFailure {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Ensure(#[from] EnsureError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// A failed publish, with enough context to diagnose it without re-running.
#[derive(Debug, Error)]
#[error("failed to publish `{source_spec}` to `{remote_url}`: {failure}")]
pub struct PublishError {
    pub source_spec: String,
    pub remote_url: String,
    #[source]
    pub failure: PublishFailure,
    /// Uploads attempted before the failure, in order. The last entry is the
    /// failed one when the failure was an upload error.
    pub outcomes: Vec<UploadOutcome>,
}

impl PublishError {
    /// Renders the full cause chain, one cause per line.
    pub fn detailed_trace(&self) -> String {
        let mut lines = vec![self.to_string()];
        let mut cause = std::error::Error::source(&self.failure);
        while let Some(err) = cause {
            lines.push(format!("   caused by: {err}"));
            cause = err.source();
        }
        lines.join("\n")
    }
}
