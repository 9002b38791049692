//! Remote collection (directory) creation.

use reqwest::StatusCode;
use tracing::{debug, error, info};

use crate::contract::WebDavClient;
use crate::error::EnsureError;
use crate::remote_path::join_remote;

/// Create every collection on the way to `base_url/target_folder`, shortest first.
///
/// `MKCOL` is issued for each prefix even when it already exists; an "already
/// exists" answer counts as success. Nothing is rolled back when a later prefix
/// fails. An empty `target_folder` issues no request.
pub async fn ensure_directories<C>(
    client: &C,
    base_url: &str,
    target_folder: &str,
) -> Result<(), EnsureError>
where
    C: WebDavClient + ?Sized,
{
    let segments: Vec<&str> = target_folder
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        debug!(base_url, "No target folder, skipping collection creation");
        return Ok(());
    }

    for depth in 1..=segments.len() {
        let url = join_remote(base_url, &segments[..depth].join("/"));
        ensure_collection(client, &url).await?;
    }
    info!(base_url, target_folder, "Remote target folder ensured");
    Ok(())
}

/// Issue a single idempotent `MKCOL` for `url`.
pub async fn ensure_collection<C>(client: &C, url: &str) -> Result<(), EnsureError>
where
    C: WebDavClient + ?Sized,
{
    match client.make_collection(url).await {
        Ok(status) if status.is_success() => {
            debug!(url, %status, "Created remote collection");
            Ok(())
        }
        Ok(status) if collection_exists(status) => {
            debug!(url, %status, "Remote collection already exists");
            Ok(())
        }
        Ok(status) => {
            error!(url, %status, "MKCOL rejected by server");
            Err(EnsureError::Status {
                path: url.to_string(),
                status,
            })
        }
        Err(source) => {
            error!(url, error = %source, "MKCOL request failed");
            Err(EnsureError::Transport {
                path: url.to_string(),
                source,
            })
        }
    }
}

/// RFC 4918 §9.3.1: `MKCOL` on an existing resource answers 405.
fn collection_exists(status: StatusCode) -> bool {
    status == StatusCode::METHOD_NOT_ALLOWED
}
