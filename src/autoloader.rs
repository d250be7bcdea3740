//=====================================================
// File: autoloader.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Lazy class resolution over the configured autoload roots
// Objective: Map symbolic names to class files or namespace directories,
//            cache the result per scope, and revalidate against the
//            filesystem unless cache_classes trusts entries forever
//=====================================================

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use crate::config::AutoloadConfig;
use crate::eager::EagerLoader;
use crate::error::{AutoloadError, Result};
use crate::naming;
use crate::probe::{Probe, probe};
use crate::registry::{ClassArtifact, Namespace, Registry, Resolved};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x1000_0000_01b3;

/// Resolves symbolic class names against the configured autoload roots,
/// loading lazily on first reference and caching per scope. The top-level
/// registry lives here; every `Namespace` carries its own private registry,
/// so resolving `A.B.C` is resolving `C` in the registry owned by `A.B`.
#[derive(Debug)]
pub struct Autoloader {
    config: AutoloadConfig,
    registry: Registry,
}

impl Autoloader {
    /// Build an autoloader from `config`. Fails when no autoload roots are
    /// configured. With `cache_classes` and `eager_load` both set, the whole
    /// tree under every root is materialized before this returns.
    pub fn new(config: AutoloadConfig) -> Result<Self> {
        let mut config = config;
        config.apply_env_overrides();
        config.validate()?;

        let loader = Self {
            config,
            registry: Registry::new(),
        };

        if loader.config.cache_classes && loader.config.eager_load {
            EagerLoader::new(&loader).load()?;
        }

        Ok(loader)
    }

    pub fn config(&self) -> &AutoloadConfig {
        &self.config
    }

    /// The top-level registry holding names resolved in the global scope.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolve `name` in the global scope. `Ok(None)` means no root carries
    /// a matching class file or directory; that is a normal miss.
    pub fn resolve(&self, name: &str) -> Result<Option<Resolved>> {
        self.resolve_scoped(name, None)
    }

    /// Resolve `name` against a namespace: the candidate path is joined onto
    /// the namespace directory and the entry is cached in the namespace's
    /// private registry.
    pub fn resolve_in(&self, namespace: &Namespace, name: &str) -> Result<Option<Resolved>> {
        self.resolve_scoped(name, Some(namespace))
    }

    /// Resolve a dotted name such as `Services.Mailer` segment by segment.
    /// Interior segments must materialize as namespaces; a miss or a class
    /// in interior position yields `Ok(None)`.
    pub fn resolve_path(&self, dotted: &str) -> Result<Option<Resolved>> {
        let mut segments = dotted.split('.');
        let first = match segments.next() {
            Some(segment) if !segment.is_empty() => segment,
            _ => return Ok(None),
        };

        let mut current = match self.resolve(first)? {
            Some(entry) => entry,
            None => return Ok(None),
        };

        for segment in segments {
            let namespace = match current.as_namespace() {
                Some(namespace) => Arc::clone(namespace),
                None => return Ok(None),
            };
            current = match self.resolve_in(&namespace, segment)? {
                Some(entry) => entry,
                None => return Ok(None),
            };
        }

        Ok(Some(current))
    }

    fn resolve_scoped(&self, name: &str, scope: Option<&Namespace>) -> Result<Option<Resolved>> {
        let registry = match scope {
            Some(namespace) => namespace.registry(),
            None => &self.registry,
        };

        if let Some(entry) = registry.get(name) {
            if self.config.cache_classes {
                return Ok(Some(entry));
            }
            if self.is_current(&entry, name, scope)? {
                return Ok(Some(entry));
            }
            debug!(name, "evicting stale autoload entry");
            registry.remove(name);
        }

        let probed = match self.locate(name, scope)? {
            Some(outcome) => outcome,
            None => return Ok(None),
        };

        let entry = match probed {
            Probe::File { path, mtime } => {
                let artifact = self.load_class(name, path, mtime)?;
                debug!(name, path = %artifact.path.display(), "autoloaded class");
                Resolved::Class(Arc::new(artifact))
            }
            Probe::Directory { path, .. } => {
                debug!(name, path = %path.display(), "materialized namespace");
                Resolved::Namespace(Arc::new(Namespace::new(name, path)))
            }
            Probe::Missing => return Ok(None),
        };

        registry.insert(name, entry.clone());
        Ok(Some(entry))
    }

    /// Probe for `name`'s candidate path. Scoped lookups join onto the
    /// namespace directory; global lookups walk the roots in order and the
    /// first root with a hit wins, later roots are never consulted.
    fn locate(&self, name: &str, scope: Option<&Namespace>) -> Result<Option<Probe>> {
        let file_name = naming::underscore(name);

        if let Some(namespace) = scope {
            return match probe(&namespace.path().join(&file_name))? {
                Probe::Missing => Ok(None),
                outcome => Ok(Some(outcome)),
            };
        }

        for root in &self.config.autoload_paths {
            match probe(&root.join(&file_name))? {
                Probe::Missing => continue,
                outcome => return Ok(Some(outcome)),
            }
        }
        Ok(None)
    }

    /// A cached entry is current when the on-disk candidate still exists,
    /// still has the same kind (file vs directory), and, for class entries,
    /// the backing file has not been modified since load. Directories are
    /// never content-checked.
    fn is_current(
        &self,
        entry: &Resolved,
        name: &str,
        scope: Option<&Namespace>,
    ) -> Result<bool> {
        let probed = match self.locate(name, scope)? {
            Some(outcome) => outcome,
            None => return Ok(false),
        };

        if entry.is_namespace() != probed.is_directory() {
            return Ok(false);
        }

        if let (Resolved::Class(artifact), Probe::File { mtime, .. }) = (entry, &probed) {
            if artifact.mtime < *mtime {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn load_class(&self, name: &str, path: PathBuf, mtime: SystemTime) -> Result<ClassArtifact> {
        let source = fs::read_to_string(&path).map_err(|error| AutoloadError::Io {
            path: path.clone(),
            source: error,
        })?;
        let fingerprint = fingerprint(&source);
        Ok(ClassArtifact {
            name: name.to_string(),
            path,
            mtime,
            source,
            fingerprint,
        })
    }
}

fn fingerprint(source: &str) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in source.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("{hash:016x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn backdate(path: &std::path::Path, by: Duration) {
        let file = fs::File::options()
            .write(true)
            .open(path)
            .expect("open class file");
        file.set_modified(SystemTime::now() - by)
            .expect("backdate mtime");
    }

    fn loader_for(root: &std::path::Path) -> Autoloader {
        Autoloader::new(AutoloadConfig::new([root])).expect("build autoloader")
    }

    #[test]
    fn repeated_resolution_reuses_the_cached_artifact() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("mailer.svs"), "class Mailer {}").expect("write class");

        let loader = loader_for(dir.path());
        let first = loader
            .resolve("Mailer")
            .expect("resolve Mailer")
            .expect("Mailer present");
        let second = loader
            .resolve("Mailer")
            .expect("resolve Mailer again")
            .expect("Mailer present");

        let first = first.as_class().expect("class artifact");
        let second = second.as_class().expect("class artifact");
        assert!(Arc::ptr_eq(first, second), "cache must hand back the same artifact");
    }

    #[test]
    fn modified_class_file_is_reloaded() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let class_path = dir.path().join("mailer.svs");
        fs::write(&class_path, "class Mailer {}").expect("write class");
        backdate(&class_path, Duration::from_secs(3600));

        let loader = loader_for(dir.path());
        let stale = loader
            .resolve("Mailer")
            .expect("resolve Mailer")
            .expect("Mailer present");
        let stale = Arc::clone(stale.as_class().expect("class artifact"));

        fs::write(&class_path, "class Mailer { fn deliver() {} }").expect("rewrite class");

        let fresh = loader
            .resolve("Mailer")
            .expect("resolve Mailer after edit")
            .expect("Mailer present");
        let fresh = fresh.as_class().expect("class artifact");

        assert!(!Arc::ptr_eq(&stale, fresh), "edit must force a fresh load");
        assert!(fresh.mtime >= stale.mtime);
        assert!(fresh.source.contains("deliver"));
        assert_ne!(fresh.fingerprint, stale.fingerprint);
    }

    #[test]
    fn cache_classes_trusts_entries_unconditionally() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let class_path = dir.path().join("mailer.svs");
        fs::write(&class_path, "class Mailer {}").expect("write class");
        backdate(&class_path, Duration::from_secs(3600));

        let mut config = AutoloadConfig::new([dir.path()]);
        config.cache_classes = true;
        let loader = Autoloader::new(config).expect("build autoloader");

        let first = loader
            .resolve("Mailer")
            .expect("resolve Mailer")
            .expect("Mailer present");
        let first = Arc::clone(first.as_class().expect("class artifact"));

        fs::write(&class_path, "class Mailer { fn deliver() {} }").expect("rewrite class");

        let second = loader
            .resolve("Mailer")
            .expect("resolve Mailer again")
            .expect("Mailer present");
        let second = second.as_class().expect("class artifact");
        assert!(Arc::ptr_eq(&first, second), "trusted cache must ignore edits");
    }

    #[test]
    fn duplicate_namespace_fails_without_partial_caching() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("queue.svs"), "class Queue {}").expect("write class");
        fs::create_dir(dir.path().join("queue")).expect("create conflicting dir");

        let loader = loader_for(dir.path());
        let error = loader.resolve("Queue").expect_err("conflict must fail");
        assert!(matches!(error, AutoloadError::DuplicateNamespace { .. }));
        assert!(loader.registry().is_empty(), "nothing may be cached on conflict");
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let loader = loader_for(dir.path());
        assert!(loader.resolve("DoesNotExist").expect("resolve miss").is_none());
    }
}
