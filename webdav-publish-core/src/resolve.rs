//! Source specification resolution.
//!
//! A source specification is either a literal path or a glob pattern, relative to
//! the agent's working directory. Resolution turns it into an ordered list of
//! [`PathMatch`]es, each carrying the local path and the fragment that gets
//! appended to the remote target to keep the local directory structure.
//!
//! For a glob, the fragment is the match's path below the pattern's fixed prefix:
//! `dist/**/*.zip` matching `dist/linux/a.zip` yields the fragment `linux/a.zip`.
//! For a literal path it is the entry's base name.
//!
//! Wildcards do not match a leading `.`, as in a shell: `dist/*` skips
//! `dist/.DS_Store`, while `dist/.*` matches it.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::ResolutionError;

const GLOB_METACHARS: &[char] = &['*', '?', '['];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// One resolved entry of a source specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// Absolute path of the matched file or directory.
    pub local_path: PathBuf,
    /// `/`-separated path to append to the remote target. Never empty, never
    /// starts with a separator, never contains `..`.
    pub relative_fragment: String,
}

impl PathMatch {
    pub fn is_dir(&self) -> bool {
        self.local_path.is_dir()
    }
}

/// Whether `spec` contains glob metacharacters.
pub fn is_glob(spec: &str) -> bool {
    spec.contains(GLOB_METACHARS)
}

/// Resolve `spec` against `working_dir`.
///
/// Returns an empty list (not an error) when nothing matches. Matches are ordered
/// depth-first with the entries of each directory sorted by file name. A matched
/// directory is returned once; its descendants are not matched separately.
///
/// # Errors
///
/// [`ResolutionError`] when the pattern is invalid or the filesystem cannot be
/// read while looking for matches.
pub fn resolve(working_dir: &Path, spec: &str) -> Result<Vec<PathMatch>, ResolutionError> {
    let matches = if is_glob(spec) {
        resolve_glob(working_dir, spec)?
    } else {
        resolve_literal(working_dir, spec)?
    };
    info!(
        working_dir = %working_dir.display(),
        source = spec,
        matches = matches.len(),
        "Resolved source specification"
    );
    Ok(matches)
}

fn resolve_literal(working_dir: &Path, spec: &str) -> Result<Vec<PathMatch>, ResolutionError> {
    let candidate = working_dir.join(spec);
    let exists = candidate.try_exists().map_err(|source| ResolutionError::Io {
        path: candidate.clone(),
        source,
    })?;
    if !exists {
        debug!(path = %candidate.display(), "Literal source does not exist");
        return Ok(Vec::new());
    }

    // `foo/..` or `.` have no file name of their own; name them after what they point at.
    let name = match candidate.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => {
            let canonical = candidate
                .canonicalize()
                .map_err(|source| ResolutionError::Io {
                    path: candidate.clone(),
                    source,
                })?;
            match canonical.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => {
                    debug!(path = %candidate.display(), "Literal source has no name to publish under");
                    return Ok(Vec::new());
                }
            }
        }
    };

    Ok(vec![PathMatch {
        local_path: absolute(&candidate)?,
        relative_fragment: name,
    }])
}

fn resolve_glob(working_dir: &Path, spec: &str) -> Result<Vec<PathMatch>, ResolutionError> {
    let (prefix, suffix) = split_pattern(spec);
    let root = working_dir.join(&prefix);

    let pattern = Pattern::new(&suffix).map_err(|source| ResolutionError::Pattern {
        pattern: spec.to_string(),
        source,
    })?;

    let root_exists = root.try_exists().map_err(|source| ResolutionError::Io {
        path: root.clone(),
        source,
    })?;
    if !root_exists || !root.is_dir() {
        debug!(root = %root.display(), "Glob prefix is not a directory, nothing to match");
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(&root).min_depth(1).sort_by_file_name();
    if !suffix.contains("**") {
        walker = walker.max_depth(suffix.split('/').count());
    }
    let mut entries = walker.into_iter();

    let mut matches = Vec::new();
    while let Some(entry) = entries.next() {
        let entry = entry.map_err(|source| ResolutionError::Walk {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.clone()),
            source,
        })?;

        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };
        let Some(fragment) = fragment_from(relative) else {
            continue;
        };
        if !pattern.matches_with(&fragment, MATCH_OPTIONS) {
            continue;
        }

        if entry.file_type().is_dir() {
            entries.skip_current_dir();
        }
        debug!(fragment = %fragment, path = %entry.path().display(), "Glob match");
        matches.push(PathMatch {
            local_path: absolute(entry.path())?,
            relative_fragment: fragment,
        });
    }
    Ok(matches)
}

/// Split a glob into its fixed directory prefix and its wildcard suffix.
///
/// The prefix is the longest run of leading segments without metacharacters.
fn split_pattern(spec: &str) -> (String, String) {
    let segments: Vec<&str> = spec.split('/').collect();
    let first_glob = segments
        .iter()
        .position(|segment| is_glob(segment))
        .unwrap_or(segments.len());

    let mut prefix = segments[..first_glob].join("/");
    if prefix.is_empty() && spec.starts_with('/') {
        prefix.push('/');
    }
    let suffix = segments[first_glob..]
        .iter()
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    (prefix, suffix)
}

/// `/`-joined normal components of `relative`, or `None` if it has anything else.
fn fragment_from(relative: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ResolutionError> {
    std::path::absolute(path).map_err(|source| ResolutionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_fixed_prefix_from_wildcards() {
        assert_eq!(split_pattern("dist/*.zip"), ("dist".into(), "*.zip".into()));
        assert_eq!(
            split_pattern("build/libs/**/*.jar"),
            ("build/libs".into(), "**/*.jar".into())
        );
        assert_eq!(split_pattern("*.txt"), ("".into(), "*.txt".into()));
        assert_eq!(split_pattern("/abs/?/x"), ("/abs".into(), "?/x".into()));
        assert_eq!(split_pattern("a//b*/c/"), ("a/".into(), "b*/c".into()));
    }

    #[test]
    fn detects_metacharacters() {
        assert!(is_glob("dist/*.zip"));
        assert!(is_glob("file?.txt"));
        assert!(is_glob("[ab].txt"));
        assert!(!is_glob("build/out.jar"));
    }

    #[test]
    fn fragment_rejects_non_normal_components() {
        assert_eq!(fragment_from(Path::new("a/b.txt")).as_deref(), Some("a/b.txt"));
        assert_eq!(fragment_from(Path::new("../b.txt")), None);
        assert_eq!(fragment_from(Path::new("/b.txt")), None);
        assert_eq!(fragment_from(Path::new("")), None);
    }
}
