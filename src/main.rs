use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dockerlint::cli::output::{render, CheckReport, FileReport};
use dockerlint::cli::{explain, scan, Cli, Commands, OutputFormat};
use dockerlint::config::Config;
use dockerlint::position::apply_edits;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

/// Config and relative-path display are both rooted at a directory; a
/// file argument resolves to its parent.
fn project_root(path: &std::path::Path) -> std::path::PathBuf {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if canonical.is_dir() {
        canonical
    } else {
        canonical.parent().map_or_else(|| canonical.clone(), std::path::Path::to_path_buf)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { path, format, config, fail_on } => {
            let project_root = project_root(&path);
            let cfg = Config::load(config.as_deref(), &project_root)?;
            let files = scan::resolve(&path)
                .with_context(|| format!("failed to scan {}", path.display()))?;
            if files.is_empty() {
                anyhow::bail!("no Dockerfiles found at {}", path.display());
            }

            let mut report = CheckReport::default();
            for file in files {
                let source = std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                let diagnostics = dockerlint::validate(&source, &cfg.validator);
                report.files.push(FileReport { path: file, diagnostics });
            }

            render(&report, &project_root, format.unwrap_or(OutputFormat::Text));

            if report.has_severity_at_least(fail_on) {
                std::process::exit(1);
            }
        }
        Commands::Fmt { path, config, write } => {
            let project_root = project_root(&path);
            let cfg = Config::load(config.as_deref(), &project_root)?;
            let files = scan::resolve(&path)
                .with_context(|| format!("failed to scan {}", path.display()))?;
            if files.is_empty() {
                anyhow::bail!("no Dockerfiles found at {}", path.display());
            }

            let mut changed = 0usize;
            for file in &files {
                let source = std::fs::read_to_string(file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                let edits = dockerlint::format(&source, &cfg.formatter);
                if edits.is_empty() {
                    continue;
                }
                changed += 1;
                let formatted = apply_edits(&source, &edits);

                if write {
                    std::fs::write(file, &formatted)
                        .with_context(|| format!("failed to write {}", file.display()))?;
                    println!("formatted {}", file.display());
                } else {
                    println!("--- {} (before)", file.display());
                    println!("{source}");
                    println!("--- {} (after)", file.display());
                    println!("{formatted}");
                }
            }

            if !write && changed > 0 {
                println!("{changed} file(s) would be reformatted; re-run with --write to apply");
            }
        }
        Commands::Init => {
            let path = std::env::current_dir()?.join(".dockerlintrc.toml");
            if path.exists() {
                eprintln!(".dockerlintrc.toml already exists");
                std::process::exit(1);
            }
            std::fs::write(&path, Config::default_toml())?;
            println!("Created .dockerlintrc.toml");
        }
        Commands::Explain { rule: None } => {
            println!("{}", explain::list_rules());
        }
        Commands::Explain { rule: Some(rule) } => {
            match explain::explain(&rule) {
                Some(text) => println!("{text}"),
                None => {
                    eprintln!("Unknown error code: {rule}\n");
                    eprintln!("{}", explain::list_rules());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
