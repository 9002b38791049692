//! High-level pipeline: resolve → ensure target → upload → metadata.
//!
//! One call to [`publish`] corresponds to publishing one artifact plan. It runs
//! through a fixed sequence of stages and stops at the first failure:
//!
//! 1. Resolve the source specification against the working directory
//!    ([`crate::resolve`]).
//! 2. Create the target folder on the remote side, if one is configured
//!    ([`crate::ensure`]). This happens even when nothing matched; an empty
//!    match list then uploads nothing and still succeeds.
//! 3. Upload every match in resolution order ([`crate::uploader`]); directories
//!    are uploaded as trees.
//! 4. Build the [`PublishMetadata`] for the host.
//!
//! Uploads are sequential and fail-fast: files after the first failure are
//! never sent.
//!
//! # Error Handling
//! Every failure is returned as a [`PublishError`] naming the source
//! specification and remote URL, and is reported on the [`Console`] both as a
//! one-line summary and as a detailed cause trace.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info, info_span, Instrument};

use crate::config::{ArtifactPlanConfig, ArtifactStoreConfig};
use crate::contract::{Console, WebDavClient};
use crate::ensure::ensure_directories;
use crate::error::{PublishError, PublishFailure};
use crate::remote_path::RemoteTarget;
use crate::resolve::{resolve, PathMatch};
use crate::uploader::{upload_recorded, upload_tree, UploadOutcome};

/// Metadata key holding the original source specification.
pub const SOURCE_KEY: &str = "Source";

/// Everything one publish needs, already parsed and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub working_dir: PathBuf,
    pub source: String,
    pub base_url: String,
    pub target_folder: String,
}

impl PublishRequest {
    pub fn from_configs(
        working_dir: impl Into<PathBuf>,
        store: &ArtifactStoreConfig,
        plan: &ArtifactPlanConfig,
    ) -> Self {
        match plan {
            ArtifactPlanConfig::Webdav(plan) => Self {
                working_dir: working_dir.into(),
                source: plan.source.clone(),
                base_url: store.url.trim().to_string(),
                target_folder: plan.target_folder().to_string(),
            },
        }
    }
}

/// What was published, keyed by logical name (at least [`SOURCE_KEY`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PublishMetadata(BTreeMap<String, String>);

impl PublishMetadata {
    pub fn for_source(source: &str) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(SOURCE_KEY.to_string(), source.to_string());
        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

/// A successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub metadata: PublishMetadata,
    /// Every file transferred, in upload order.
    pub outcomes: Vec<UploadOutcome>,
    /// Human-readable confirmation, also sent to the console.
    pub message: String,
}

/// Publish `request` through `client`, reporting progress on `console`.
pub async fn publish<C, L>(
    client: &C,
    console: &L,
    request: &PublishRequest,
) -> Result<PublishReport, PublishError>
where
    C: WebDavClient + ?Sized,
    L: Console + ?Sized,
{
    let span = info_span!("publish", source = %request.source, remote_url = %request.base_url);
    let mut outcomes = Vec::new();

    let result = run_stages(client, request, &mut outcomes)
        .instrument(span)
        .await;

    match result {
        Ok(()) => {
            let message = format!(
                "Source file `{}` successfully pushed to WebDAV `{}`.",
                request.source, request.base_url
            );
            console.info(&message);
            Ok(PublishReport {
                metadata: PublishMetadata::for_source(&request.source),
                outcomes,
                message,
            })
        }
        Err(failure) => {
            let err = PublishError {
                source_spec: request.source.clone(),
                remote_url: request.base_url.clone(),
                failure,
                outcomes,
            };
            error!(error = %err, "Publish failed");
            console.error(&err.to_string());
            console.error(&err.detailed_trace());
            Err(err)
        }
    }
}

async fn run_stages<C>(
    client: &C,
    request: &PublishRequest,
    outcomes: &mut Vec<UploadOutcome>,
) -> Result<(), PublishFailure>
where
    C: WebDavClient + ?Sized,
{
    let matches = resolve(&request.working_dir, &request.source)?;

    let target = RemoteTarget::new(&request.base_url, &request.target_folder);
    ensure_directories(client, &target.base_url, &target.target_folder).await?;

    if matches.is_empty() {
        info!("Nothing matched the source specification, nothing to upload");
        return Ok(());
    }

    for path_match in &matches {
        upload_match(client, &target, path_match, outcomes).await?;
    }
    info!(files = outcomes.len(), "All matches uploaded");
    Ok(())
}

async fn upload_match<C>(
    client: &C,
    target: &RemoteTarget,
    path_match: &PathMatch,
    outcomes: &mut Vec<UploadOutcome>,
) -> Result<(), PublishFailure>
where
    C: WebDavClient + ?Sized,
{
    let remote_path = target.path_for(&path_match.relative_fragment);

    // `dist/**/*.zip` can match `linux/a.zip`; `linux` must exist under the target first.
    if let Some((parents, _)) = path_match.relative_fragment.rsplit_once('/') {
        ensure_directories(client, &target.folder_url(), parents).await?;
    }

    if path_match.is_dir() {
        upload_tree(client, &remote_path, &path_match.local_path, outcomes).await?;
    } else {
        upload_recorded(client, &remote_path, &path_match.local_path, outcomes).await?;
    }
    Ok(())
}
