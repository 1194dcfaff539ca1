//! divscope-powerdb - maintenance tool for power databases.
//!
//! ```text
//! divscope-powerdb init  <path>   write a fresh database with the built-in defaults
//! divscope-powerdb check <path>   load and report counts and skipped records
//! divscope-powerdb dump  <path>   print powers, aliases and groups as JSON
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use divscope_engine::entities::{CapabilityBitset, GroupList, PowerSpace};
use divscope_engine::infrastructure::{audit::AbortFatalSink, config::EngineConfig, persistence};
use divscope_engine::use_cases::{Bootstrap, BootstrapReport};

const USAGE: &str = "Usage: divscope-powerdb <command> <path>\n\nCommands:\n  init\n  check\n  dump";

fn main() -> anyhow::Result<()> {
    // Load environment from repo root so DIVSCOPE_* overrides apply.
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "divscope_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let command = args.next();
    let path = args.next().map(PathBuf::from);
    let (Some(command), Some(path)) = (command, path) else {
        anyhow::bail!(USAGE);
    };

    let config = EngineConfig::from_env().context("reading DIVSCOPE_* configuration")?;
    let bootstrap = Bootstrap::new(Arc::new(AbortFatalSink));

    match command.as_str() {
        "init" => init(config, &bootstrap, &path),
        "check" => check(config, &bootstrap, &path),
        "dump" => dump(config, &path),
        other => anyhow::bail!("Unknown command: {other}\n\n{USAGE}"),
    }
}

fn init(config: EngineConfig, bootstrap: &Bootstrap, path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    let mut space = PowerSpace::new(config);
    let report = bootstrap.install_defaults(&mut space);
    persistence::save_file(&space, path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!(
        "Wrote {}: {} powers, {} aliases, {} groups",
        path.display(),
        report.powers.len(),
        report.aliases.len(),
        report.groups.len()
    );
    Ok(())
}

#[derive(Serialize)]
struct CheckOutput {
    loaded: persistence::LoadReport,
    missing_defaults: BootstrapReport,
}

fn check(config: EngineConfig, bootstrap: &Bootstrap, path: &Path) -> anyhow::Result<()> {
    let mut space = PowerSpace::new(config);
    let loaded = persistence::load_file(&mut space, path)
        .with_context(|| format!("loading {}", path.display()))?;
    let missing_defaults = bootstrap.install_defaults(&mut space);
    let output = CheckOutput {
        loaded,
        missing_defaults,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[derive(Serialize)]
struct DumpPower {
    name: String,
    comparator: &'static str,
}

#[derive(Serialize)]
struct DumpAlias {
    alias: String,
    power: String,
}

#[derive(Serialize)]
struct DumpGroup {
    name: String,
    ceiling: Vec<String>,
    auto: Vec<String>,
}

#[derive(Serialize)]
struct Dump {
    powers: Vec<DumpPower>,
    aliases: Vec<DumpAlias>,
    groups: Vec<DumpGroup>,
}

fn dump(config: EngineConfig, path: &Path) -> anyhow::Result<()> {
    let mut space = PowerSpace::new(config);
    persistence::load_file(&mut space, path)
        .with_context(|| format!("loading {}", path.display()))?;

    let powers = space
        .powers()
        .iter()
        .map(|p| DumpPower {
            name: p.name.clone(),
            comparator: p.comparator.type_name(),
        })
        .collect();
    let aliases = space
        .powers()
        .aliases()
        .map(|a| DumpAlias {
            alias: a.name.clone(),
            power: space
                .powers()
                .get_exact(&a.target)
                .map_or_else(|| a.target.clone(), |p| p.name.clone()),
        })
        .collect();
    let groups = space
        .groups()
        .iter()
        .map(|g| DumpGroup {
            name: g.name.clone(),
            ceiling: tokens(&space, g.list(GroupList::Ceiling)),
            auto: tokens(&space, g.list(GroupList::Auto)),
        })
        .collect();

    let dump = Dump {
        powers,
        aliases,
        groups,
    };
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}

fn tokens(space: &PowerSpace, bits: &CapabilityBitset) -> Vec<String> {
    space
        .tier_list(Some(bits))
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
