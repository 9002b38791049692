//! Remote path construction.
//!
//! Remote paths are built by joining `/`-separated segments onto a base URL.
//! Empty segments are dropped, so doubled or stray separators in any input never
//! reach the server, and the `scheme://` separator of the base is left intact.
//!
//! The base is used as configured. Every appended segment is percent-encoded, so
//! local names containing `#`, `?`, `%` or spaces stay part of the path.

use std::borrow::Cow;

/// Join `fragment` onto `base` with exactly one `/` between non-empty segments.
///
/// Segments of `fragment` are percent-encoded; `base` is not.
///
/// ```
/// use webdav_publish_core::remote_path::join_remote;
///
/// assert_eq!(join_remote("https://dav.example.com/files/", "/a//b.zip"), "https://dav.example.com/files/a/b.zip");
/// assert_eq!(join_remote(&join_remote("https://h/x", "a"), "b"), join_remote("https://h/x", "a/b"));
/// assert_eq!(join_remote("https://h/x", "report#1.txt"), "https://h/x/report%231.txt");
/// ```
pub fn join_remote(base: &str, fragment: &str) -> String {
    let (scheme, rest) = match base.find("://") {
        Some(idx) => base.split_at(idx + 3),
        None => ("", base),
    };
    let root = if scheme.is_empty() && rest.starts_with('/') {
        "/"
    } else {
        ""
    };

    let segments: Vec<Cow<'_, str>> = rest
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(Cow::Borrowed)
        .chain(
            fragment
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(urlencoding::encode),
        )
        .collect();

    format!("{scheme}{root}{}", segments.join("/"))
}

/// Where a publish lands: the store's base URL plus an optional target folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub base_url: String,
    pub target_folder: String,
}

impl RemoteTarget {
    pub fn new(base_url: impl Into<String>, target_folder: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            target_folder: target_folder.into(),
        }
    }

    /// URL of the target folder itself (the base URL when no folder is set).
    pub fn folder_url(&self) -> String {
        join_remote(&self.base_url, &self.target_folder)
    }

    /// Final remote path for a resolved match's relative fragment.
    pub fn path_for(&self, relative_fragment: &str) -> String {
        join_remote(&self.folder_url(), relative_fragment)
    }
}
