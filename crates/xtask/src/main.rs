use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Internal crates each workspace crate may depend on.
const ALLOWED: &[(&str, &[&str])] = &[
    ("divscope-domain", &[]),
    ("divscope-engine", &["divscope-domain"]),
    ("xtask", &[]),
];

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

#[derive(Deserialize)]
struct Metadata {
    packages: Vec<Package>,
    workspace_root: PathBuf,
}

#[derive(Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Deserialize)]
struct Dependency {
    name: String,
    kind: Option<String>,
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }
    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;

    let allowed: BTreeMap<&str, &[&str]> = ALLOWED.iter().copied().collect();
    let internal: Vec<&str> = metadata.packages.iter().map(|p| p.name.as_str()).collect();
    let mut violations = Vec::new();

    for package in &metadata.packages {
        let Some(permitted) = allowed.get(package.name.as_str()) else {
            violations.push(format!("{}: not a known workspace crate", package.name));
            continue;
        };
        for dep in &package.dependencies {
            // Dev-dependencies may reach further for fixtures.
            if dep.kind.as_deref() == Some("dev") {
                continue;
            }
            if internal.contains(&dep.name.as_str()) && !permitted.contains(&dep.name.as_str()) {
                violations.push(format!("{} must not depend on {}", package.name, dep.name));
            }
        }
    }

    violations.extend(domain_source_violations(&metadata.workspace_root)?);

    if violations.is_empty() {
        println!("arch-check: ok ({} crates)", metadata.packages.len());
        return Ok(());
    }
    for violation in &violations {
        eprintln!("arch-check: {violation}");
    }
    anyhow::bail!("{} layering violation(s)", violations.len())
}

/// The domain crate stays plain data: no engine paths and no I/O or
/// logging crates in its sources.
fn domain_source_violations(root: &Path) -> anyhow::Result<Vec<String>> {
    let forbidden = regex_lite::Regex::new(r"\b(divscope_engine|tracing|std::fs|std::io)::")
        .context("compiling domain pattern")?;
    let mut files = Vec::new();
    collect_rust_files(&root.join("crates/domain/src"), &mut files)?;

    let mut violations = Vec::new();
    for file in files {
        let source = std::fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        for (line_no, line) in source.lines().enumerate() {
            if let Some(found) = forbidden.find(line) {
                violations.push(format!(
                    "{}:{}: domain code uses {}",
                    file.display(),
                    line_no + 1,
                    found.as_str().trim_end_matches("::")
                ));
            }
        }
    }
    Ok(violations)
}

fn collect_rust_files(dir: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            collect_rust_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
    Ok(())
}
