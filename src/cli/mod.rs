//! `dockerlint` command-line front end: argument parsing, result
//! rendering, and the error-code catalog behind `explain`.

pub mod explain;
pub mod output;
pub mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use crate::diagnostics::Severity;

#[derive(Parser, Debug)]
#[command(name = "dockerlint", version, about = "Static analysis and formatting for Dockerfiles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lint a Dockerfile, or every `Dockerfile*` under a directory
    Check {
        /// File or directory to scan
        path: PathBuf,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Minimum severity that causes a non-zero exit code
        #[arg(long, default_value = "error")]
        fail_on: Severity,
    },
    /// Format a Dockerfile, or every `Dockerfile*` under a directory
    Fmt {
        /// File or directory to format
        path: PathBuf,

        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Apply edits in place instead of printing before/after
        #[arg(long)]
        write: bool,
    },
    /// Create a default .dockerlintrc.toml
    Init,
    /// Print the error-code catalog, or one code's description
    Explain {
        /// Error code (e.g., NoSourceImage, InvalidPort)
        rule: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
