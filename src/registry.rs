//! Cache storage for resolved names. The autoloader owns one top-level
//! `Registry`; every materialized `Namespace` owns a private one of the same
//! shape, which is what makes nested resolution a uniform recursive lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;

/// A class implementation loaded from disk. The mtime is the backing file's
/// modification time observed at load, used for staleness checks when
/// `cache_classes` is off.
#[derive(Debug)]
pub struct ClassArtifact {
    pub name: String,
    pub path: PathBuf,
    pub mtime: SystemTime,
    pub source: String,
    pub fingerprint: String,
}

/// Directory stand-in for a namespace. Carries its own registry for names
/// nested directly beneath it; evicting the namespace from its parent
/// registry discards that registry with it.
#[derive(Debug)]
pub struct Namespace {
    name: String,
    path: PathBuf,
    registry: Registry,
}

impl Namespace {
    pub(crate) fn new(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
            registry: Registry::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// A cache entry: either a loaded class artifact or a synthesized namespace.
#[derive(Debug, Clone)]
pub enum Resolved {
    Class(Arc<ClassArtifact>),
    Namespace(Arc<Namespace>),
}

impl Resolved {
    pub fn is_namespace(&self) -> bool {
        matches!(self, Resolved::Namespace(_))
    }

    pub fn name(&self) -> &str {
        match self {
            Resolved::Class(artifact) => &artifact.name,
            Resolved::Namespace(namespace) => namespace.name(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Resolved::Class(artifact) => &artifact.path,
            Resolved::Namespace(namespace) => namespace.path(),
        }
    }

    pub fn as_class(&self) -> Option<&Arc<ClassArtifact>> {
        match self {
            Resolved::Class(artifact) => Some(artifact),
            Resolved::Namespace(_) => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&Arc<Namespace>> {
        match self {
            Resolved::Namespace(namespace) => Some(namespace),
            Resolved::Class(_) => None,
        }
    }
}

/// Name → entry table. Access is serialized per registry so the resolver's
/// lookup / insert / evict steps stay individually atomic under concurrent
/// callers; two racing cold loads of one name at worst overwrite each other.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<HashMap<String, Resolved>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Resolved> {
        self.entries.lock().get(name).cloned()
    }

    pub fn insert(&self, name: impl Into<String>, entry: Resolved) {
        self.entries.lock().insert(name.into(), entry);
    }

    pub fn remove(&self, name: &str) -> Option<Resolved> {
        self.entries.lock().remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_round_trip_through_the_table() {
        let registry = Registry::new();
        assert!(registry.is_empty());

        let namespace = Arc::new(Namespace::new("Services", PathBuf::from("/tmp/services")));
        registry.insert("Services", Resolved::Namespace(namespace));

        let entry = registry.get("Services").expect("entry present");
        assert!(entry.is_namespace());
        assert_eq!(entry.name(), "Services");
        assert_eq!(registry.names(), vec!["Services".to_string()]);

        registry.remove("Services");
        assert!(registry.get("Services").is_none());
    }

    #[test]
    fn clear_drops_every_entry() {
        let registry = Registry::new();
        registry.insert(
            "Jobs",
            Resolved::Namespace(Arc::new(Namespace::new("Jobs", PathBuf::from("/tmp/jobs")))),
        );
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.is_empty());
    }
}
