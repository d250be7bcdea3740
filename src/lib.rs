//=====================================================
// File: lib.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Solvra autoload library main interface
// Objective: Export the resolver, cache registry, file probe, name
//            transforms, eager walker, and configuration for lazy
//            class autoloading over filesystem hierarchies
//=====================================================

pub mod autoloader;
pub mod config;
pub mod eager;
pub mod error;
pub mod naming;
pub mod probe;
pub mod registry;

pub use autoloader::Autoloader;
pub use config::AutoloadConfig;
pub use eager::EagerLoader;
pub use error::{AutoloadError, Result};
pub use probe::{CLASS_EXT, Probe, probe};
pub use registry::{ClassArtifact, Namespace, Registry, Resolved};

//=====================================================
// End of file
//=====================================================
