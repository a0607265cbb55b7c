//! omni-var CLI: refactor one file or a whole source tree.
//!
//! Settings come from `packages/conf/omni-var.yaml` and the user config home;
//! command-line flags win over both.
//!
//! Logging: set `RUST_LOG=omni_var=debug` (or pass `--verbose`) to see logs on stderr.

mod cli;

use std::io::{Read, Write};
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use omni_var::{
    BatchConfig, RefactorPolicy, VarRefactorer, VarSettings, generate_file_diff, load_settings,
    read_source_file, refactor_source,
};

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_var=debug"
        } else {
            "omni_var=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = load_settings(cli.conf.as_deref());
    let policy = settings
        .policy
        .merge(cli.policy.to_settings())
        .resolve(RefactorPolicy::default());

    match cli.command {
        Command::File {
            path,
            java_version,
            write,
            diff,
            json,
        } => {
            let version = java_version.unwrap_or_else(|| settings.java_version().to_string());
            run_file(&path, &version, &policy, &settings, FileOutput { write, diff, json })
        }
        Command::Tree {
            root,
            java_version,
            pattern,
            write,
            workers,
            json,
        } => {
            let version = java_version.unwrap_or_else(|| settings.java_version().to_string());
            let mut config = settings.batch_config();
            if let Some(pattern) = pattern {
                config.file_pattern = pattern;
            }
            if let Some(workers) = workers {
                config.workers = workers;
            }
            if write {
                config.dry_run = false;
            }
            run_tree(&root, &version, &policy, &config, json)
        }
    }
}

struct FileOutput {
    write: bool,
    diff: bool,
    json: bool,
}

fn run_file(
    path: &str,
    version: &str,
    policy: &RefactorPolicy,
    settings: &VarSettings,
    output: FileOutput,
) -> anyhow::Result<()> {
    let from_stdin = path == "-";
    let source = if from_stdin {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        buffer
    } else {
        read_source_file(path, settings.batch_config().max_file_size)
            .with_context(|| format!("failed to read {path}"))?
    };

    let result = refactor_source(&source, version, policy);
    tracing::info!(path, version, replacements = result.count, "processed file");

    if output.write && !from_stdin {
        if result.is_modified() {
            std::fs::write(path, &result.modified)
                .with_context(|| format!("failed to write {path}"))?;
        }
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    if output.json {
        serde_json::to_writer_pretty(&mut stdout, &result).context("failed to encode result")?;
        writeln!(stdout)?;
    } else if output.diff {
        stdout.write_all(generate_file_diff(path, &result.original, &result.modified).as_bytes())?;
    } else {
        stdout.write_all(result.modified.as_bytes())?;
    }
    Ok(())
}

fn run_tree(
    root: &Path,
    version: &str,
    policy: &RefactorPolicy,
    config: &BatchConfig,
    json: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(root.is_dir(), "not a directory: {}", root.display());

    let stats = VarRefactorer::refactor_tree(root, version, policy, config, None);

    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &stats).context("failed to encode stats")?;
        writeln!(stdout)?;
        return Ok(());
    }

    let verb = if config.dry_run { "would change" } else { "changed" };
    for file in &stats.modified_files {
        writeln!(stdout, "{verb} {file}")?;
    }
    let mut errors: Vec<_> = stats.errors.iter().collect();
    errors.sort();
    for (file, error) in errors {
        writeln!(stdout, "error {file}: {error}")?;
    }
    writeln!(
        stdout,
        "{} scanned, {} {verb}, {} replacements",
        stats.files_scanned, stats.files_changed, stats.replacements
    )?;
    Ok(())
}
