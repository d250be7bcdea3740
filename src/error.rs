use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AutoloadError>;

/// Failures surfaced by the autoloader. A name that simply does not exist is
/// not an error; resolution reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum AutoloadError {
    #[error("autoload_paths requires at least one search directory")]
    MissingAutoloadPaths,

    #[error("duplicate namespace at: {}", path.display())]
    DuplicateNamespace { path: PathBuf },

    #[error("failed reading class file '{}': {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
