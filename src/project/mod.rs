//! Filesystem glue: discovering documents and writing results back.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::pipeline::{BatchReport, Document};

/// Errors raised while discovering documents.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Directory not found: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of [`collect_documents`]. Files that could not be read are
/// listed in `failed`; the rest of the tree is still collected.
#[derive(Debug, Default)]
pub struct Discovery {
    pub documents: Vec<Document>,
    pub failed: Vec<ProjectError>,
}

/// Outcome of [`write_back`].
#[derive(Debug, Default)]
pub struct WriteBack {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, std::io::Error)>,
}

/// `/`-separated form of `path` relative to `root`. Only the platform's own
/// separator is rewritten; other characters in file names are kept.
fn relative_path(root: &Path, path: &Path) -> PathBuf {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    PathBuf::from(joined)
}

/// Load every file under `root` whose extension is in `extensions` (all
/// files when empty). Paths are relative to `root` and sorted.
///
/// Only a missing root is an error. Unreadable entries and files that are
/// not UTF-8 are recorded in [`Discovery::failed`].
pub fn collect_documents(root: &Path, extensions: &[&str]) -> Result<Discovery, ProjectError> {
    if !root.is_dir() {
        return Err(ProjectError::NotADirectory(root.to_path_buf()));
    }

    let mut discovery = Discovery::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry under {}: {}", root.display(), e);
                discovery.failed.push(ProjectError::Walk(e));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let wanted = extensions.is_empty()
            || path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| extensions.contains(&ext));
        if !wanted {
            continue;
        }
        match std::fs::read_to_string(path) {
            Ok(text) => discovery
                .documents
                .push(Document::new(relative_path(root, path), text)),
            Err(source) => {
                tracing::warn!("skipping {}: {}", path.display(), source);
                discovery.failed.push(ProjectError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }

    tracing::debug!(
        "collected {} document(s) from {}, {} failed",
        discovery.documents.len(),
        root.display(),
        discovery.failed.len()
    );
    Ok(discovery)
}

/// Write outputs of mutated, error-free documents under `root`. A failing
/// write is recorded and the remaining documents are still written.
pub fn write_back(root: &Path, report: &BatchReport) -> WriteBack {
    let mut outcome = WriteBack::default();
    for result in report.changed() {
        let Some(output) = &result.output else {
            continue;
        };
        let target = root.join(&result.path);
        match std::fs::write(&target, output) {
            Ok(()) => outcome.written.push(target),
            Err(e) => {
                tracing::warn!("failed to write {}: {}", target.display(), e);
                outcome.failed.push((target, e));
            }
        }
    }
    outcome
}
