//! # uploader: file and directory transfer
//!
//! - [`upload_file`] sends one local file with a single `PUT`.
//! - [`upload_tree`] sends a whole local directory, creating one remote
//!   collection per local directory on the way.
//!
//! Uploads are strictly sequential and stop at the first failure. Every
//! attempted file is recorded as an [`UploadOutcome`].

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::contract::WebDavClient;
use crate::ensure::ensure_collection;
use crate::error::UploadError;
use crate::remote_path::join_remote;

/// Result of one attempted file transfer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UploadOutcome {
    pub local_path: PathBuf,
    pub remote_path: String,
    pub succeeded: bool,
    /// Present iff the transfer failed.
    pub error: Option<String>,
}

impl UploadOutcome {
    fn from_result(local_path: &Path, remote_path: &str, result: &Result<(), UploadError>) -> Self {
        Self {
            local_path: local_path.to_path_buf(),
            remote_path: remote_path.to_string(),
            succeeded: result.is_ok(),
            error: result.as_ref().err().map(ToString::to_string),
        }
    }
}

/// `PUT` the contents of `local_path` to `remote_path`.
pub async fn upload_file<C>(client: &C, remote_path: &str, local_path: &Path) -> Result<(), UploadError>
where
    C: WebDavClient + ?Sized,
{
    debug!(local = %local_path.display(), remote = remote_path, "Uploading file");
    match client.put_file(remote_path, local_path).await {
        Ok(status) if status.is_success() => {
            info!(local = %local_path.display(), remote = remote_path, %status, "Uploaded file");
            Ok(())
        }
        Ok(status) => {
            error!(local = %local_path.display(), remote = remote_path, %status, "PUT rejected by server");
            Err(UploadError::Status {
                path: remote_path.to_string(),
                status,
            })
        }
        Err(source) => {
            error!(local = %local_path.display(), remote = remote_path, error = %source, "PUT request failed");
            Err(UploadError::Transport {
                path: remote_path.to_string(),
                source,
            })
        }
    }
}

/// Upload one file and record the attempt in `outcomes`.
pub async fn upload_recorded<C>(
    client: &C,
    remote_path: &str,
    local_path: &Path,
    outcomes: &mut Vec<UploadOutcome>,
) -> Result<(), UploadError>
where
    C: WebDavClient + ?Sized,
{
    let result = upload_file(client, remote_path, local_path).await;
    outcomes.push(UploadOutcome::from_result(local_path, remote_path, &result));
    result
}

/// An entry waiting to be uploaded, with the remote path it maps to.
struct Pending {
    local: PathBuf,
    remote: String,
    is_dir: bool,
}

/// Upload the directory `local_dir` so that it appears at `remote_base`.
///
/// Traversal is pre-order depth-first with each directory's entries sorted by
/// file name, driven by an explicit stack rather than recursion. Each directory
/// (starting with `local_dir` itself) gets an idempotent `MKCOL` before any of
/// its children are sent. The first failure stops the walk; the failed file is
/// the last entry pushed to `outcomes` and nothing after it is attempted.
pub async fn upload_tree<C>(
    client: &C,
    remote_base: &str,
    local_dir: &Path,
    outcomes: &mut Vec<UploadOutcome>,
) -> Result<(), UploadError>
where
    C: WebDavClient + ?Sized,
{
    let mut stack = vec![Pending {
        local: local_dir.to_path_buf(),
        remote: remote_base.to_string(),
        is_dir: true,
    }];

    while let Some(entry) = stack.pop() {
        if !entry.is_dir {
            upload_recorded(client, &entry.remote, &entry.local, outcomes).await?;
            continue;
        }

        ensure_collection(client, &entry.remote).await?;
        let children = list_children(&entry.local).await?;
        debug!(
            local = %entry.local.display(),
            remote = %entry.remote,
            children = children.len(),
            "Descending into directory"
        );
        // Reversed so the first child is popped first.
        for (name, local, is_dir) in children.into_iter().rev() {
            stack.push(Pending {
                remote: join_remote(&entry.remote, &name),
                local,
                is_dir,
            });
        }
    }
    Ok(())
}

/// Immediate children of `dir` as `(name, path, is_dir)`, sorted by name.
async fn list_children(dir: &Path) -> Result<Vec<(String, PathBuf, bool)>, UploadError> {
    let io_err = |source| UploadError::Io {
        local: dir.to_path_buf(),
        source,
    };

    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut children = Vec::new();
    while let Some(child) = read_dir.next_entry().await.map_err(io_err)? {
        // Symlinks are not followed here; a link to a directory would otherwise allow cycles.
        let is_dir = child.file_type().await.map_err(io_err)?.is_dir();
        children.push((child.file_name().to_string_lossy().into_owned(), child.path(), is_dir));
    }
    children.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(children)
}
