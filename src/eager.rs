use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::autoloader::Autoloader;
use crate::error::{AutoloadError, Result};
use crate::naming;
use crate::probe::CLASS_EXT;
use crate::registry::{Namespace, Resolved};

/// Warm-up walker: forces the autoloader to materialize every class file and
/// namespace directory under the configured roots ahead of first use. Its
/// only effect is a populated cache; naming conflicts and unreadable
/// directories abort the walk.
pub struct EagerLoader<'a> {
    autoloader: &'a Autoloader,
}

impl<'a> EagerLoader<'a> {
    pub fn new(autoloader: &'a Autoloader) -> Self {
        Self { autoloader }
    }

    pub fn load(&self) -> Result<()> {
        for root in &self.autoloader.config().autoload_paths {
            self.load_directory(root, None)?;
        }
        debug!(
            entries = self.autoloader.registry().len(),
            "eager warm-up complete"
        );
        Ok(())
    }

    fn load_directory(&self, dir: &Path, scope: Option<&Namespace>) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|error| AutoloadError::Io {
            path: dir.to_path_buf(),
            source: error,
        })?;

        for entry in entries.flatten() {
            let path = entry.path();
            let is_class_file = path.is_file()
                && path.extension().and_then(OsStr::to_str) == Some(CLASS_EXT);
            if !is_class_file && !path.is_dir() {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(OsStr::to_str) else {
                continue;
            };
            let class_name = naming::camelize(stem);

            let resolved = match scope {
                Some(namespace) => self.autoloader.resolve_in(namespace, &class_name)?,
                None => self.autoloader.resolve(&class_name)?,
            };

            if let Some(Resolved::Namespace(namespace)) = resolved {
                self.load_directory(namespace.path(), Some(&namespace))?;
            }
        }

        Ok(())
    }
}
