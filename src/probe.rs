//! Filesystem probing for class candidates: decide whether an extension-less
//! base path is backed by a class file, a namespace directory, both
//! (a fatal naming conflict), or nothing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::trace;

use crate::error::{AutoloadError, Result};

/// Extension of SolvraScript class implementation files.
pub const CLASS_EXT: &str = "svs";

/// Outcome of probing an extension-less candidate path.
#[derive(Debug, Clone)]
pub enum Probe {
    /// `base.svs` exists and nothing claims the bare `base` path.
    File { path: PathBuf, mtime: SystemTime },
    /// No class file, but a directory sits at `base` exactly.
    Directory { path: PathBuf, mtime: SystemTime },
    /// Neither a class file nor a directory.
    Missing,
}

impl Probe {
    pub fn is_directory(&self) -> bool {
        matches!(self, Probe::Directory { .. })
    }
}

/// Probe `base` for a class candidate. The file form is checked first; a
/// directory at the exact extension-less path alongside it is a
/// `DuplicateNamespace` error rather than a silent preference either way.
pub fn probe(base: &Path) -> Result<Probe> {
    let file_path = base.with_extension(CLASS_EXT);
    let file_meta = fs::metadata(&file_path).ok().filter(|meta| meta.is_file());
    let dir_meta = fs::metadata(base).ok().filter(|meta| meta.is_dir());

    match (file_meta, dir_meta) {
        (Some(_), Some(_)) => Err(AutoloadError::DuplicateNamespace {
            path: base.to_path_buf(),
        }),
        (Some(meta), None) => {
            let mtime = modified(&file_path, &meta)?;
            trace!(path = %file_path.display(), "probe hit class file");
            Ok(Probe::File {
                path: file_path,
                mtime,
            })
        }
        (None, Some(meta)) => {
            let mtime = modified(base, &meta)?;
            trace!(path = %base.display(), "probe hit directory");
            Ok(Probe::Directory {
                path: base.to_path_buf(),
                mtime,
            })
        }
        (None, None) => Ok(Probe::Missing),
    }
}

fn modified(path: &Path, meta: &fs::Metadata) -> Result<SystemTime> {
    meta.modified().map_err(|error| AutoloadError::Io {
        path: path.to_path_buf(),
        source: error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_class_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("mailer.svs"), "class Mailer {}").expect("write class");

        let outcome = probe(&dir.path().join("mailer")).expect("probe mailer");
        match outcome {
            Probe::File { path, .. } => assert!(path.ends_with("mailer.svs")),
            other => panic!("expected file outcome, got {other:?}"),
        }
    }

    #[test]
    fn probes_directory() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir(dir.path().join("services")).expect("create namespace dir");

        let outcome = probe(&dir.path().join("services")).expect("probe services");
        assert!(outcome.is_directory());
    }

    #[test]
    fn missing_candidate_is_not_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let outcome = probe(&dir.path().join("ghost")).expect("probe ghost");
        assert!(matches!(outcome, Probe::Missing));
    }

    #[test]
    fn file_and_directory_conflict_is_fatal() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("queue.svs"), "class Queue {}").expect("write class");
        fs::create_dir(dir.path().join("queue")).expect("create conflicting dir");

        let error = probe(&dir.path().join("queue")).expect_err("conflict must fail");
        match error {
            AutoloadError::DuplicateNamespace { path } => assert!(path.ends_with("queue")),
            other => panic!("expected duplicate namespace error, got {other:?}"),
        }
    }
}
