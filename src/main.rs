//=====================================================
// File: main.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Solvra autoload CLI entry point
// Objective: Command-line interface for resolving class names against
//            autoload roots and warming the cache eagerly, with JSON
//            output for tooling
//=====================================================

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt};

use solvra_autoload::{AutoloadConfig, Autoloader, EagerLoader, Resolved};

#[derive(Parser, Debug)]
#[command(name = "solvra_autoload", about = "SolvraScript class autoloader CLI")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a class name; dotted names walk nested namespaces.
    Resolve(ResolveArgs),
    /// Warm the cache by loading every class under the configured roots.
    Eager(EagerArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ResolveArgs {
    /// Class name to resolve, e.g. HttpClient or Services.Mailer.
    pub name: String,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Emit the outcome as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct EagerArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CommonArgs {
    /// Autoload root directory (repeatable).
    #[arg(short = 'p', long = "path")]
    pub paths: Vec<PathBuf>,

    /// TOML configuration file with autoload settings.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Trust cached classes unconditionally.
    #[arg(long = "cache-classes")]
    pub cache_classes: bool,
}

fn main() -> Result<()> {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args = Args::parse();
    match args.command {
        Command::Resolve(cmd) => run_resolve(cmd),
        Command::Eager(cmd) => run_eager(cmd),
    }
}

fn build_config(common: &CommonArgs) -> Result<AutoloadConfig> {
    let mut config = match &common.config {
        Some(path) => AutoloadConfig::load(path)?,
        None => AutoloadConfig::default(),
    };
    for path in &common.paths {
        config.add_autoload_path(path.clone());
    }
    if common.cache_classes {
        config.cache_classes = true;
    }
    Ok(config)
}

fn run_resolve(cmd: ResolveArgs) -> Result<()> {
    let config = build_config(&cmd.common)?;
    let loader = Autoloader::new(config).context("building autoloader")?;

    let resolved = loader
        .resolve_path(&cmd.name)
        .with_context(|| format!("resolving '{}'", cmd.name))?;

    let Some(resolved) = resolved else {
        if cmd.json {
            println!("{}", json!({ "name": cmd.name, "kind": null }));
            return Ok(());
        }
        bail!("class '{}' could not be located", cmd.name);
    };

    if cmd.json {
        let payload = match &resolved {
            Resolved::Class(artifact) => json!({
                "name": cmd.name,
                "kind": "class",
                "path": artifact.path,
                "fingerprint": artifact.fingerprint,
            }),
            Resolved::Namespace(namespace) => json!({
                "name": cmd.name,
                "kind": "namespace",
                "path": namespace.path(),
            }),
        };
        println!("{payload}");
        return Ok(());
    }

    match &resolved {
        Resolved::Class(artifact) => {
            println!("class {} -> {}", cmd.name, artifact.path.display());
        }
        Resolved::Namespace(namespace) => {
            println!("namespace {} -> {}", cmd.name, namespace.path().display());
        }
    }
    Ok(())
}

fn run_eager(cmd: EagerArgs) -> Result<()> {
    let config = build_config(&cmd.common)?;
    let loader = Autoloader::new(config).context("building autoloader")?;

    EagerLoader::new(&loader).load().context("eager warm-up")?;

    let names = loader.registry().names();
    println!("warmed {} top-level entries", names.len());
    for name in names {
        println!("  {name}");
    }
    Ok(())
}
