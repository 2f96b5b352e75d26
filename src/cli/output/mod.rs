pub mod json;
pub mod text;

use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::diagnostics::{Diagnostic, Severity};

/// Diagnostics for one scanned file, in emission order.
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

/// The result of `check` across every file resolved from the CLI path.
#[derive(Default)]
pub struct CheckReport {
    pub files: Vec<FileReport>,
}

impl CheckReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.files
            .iter()
            .flat_map(|f| &f.diagnostics)
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn has_severity_at_least(&self, threshold: Severity) -> bool {
        self.files
            .iter()
            .flat_map(|f| &f.diagnostics)
            .any(|d| d.severity >= threshold)
    }
}

pub fn render(report: &CheckReport, project_root: &Path, format: OutputFormat) {
    match format {
        OutputFormat::Text => text::render(report, project_root),
        OutputFormat::Json => json::render(report, project_root),
    }
}

fn relative_path(file: &Path, project_root: &Path) -> String {
    file.strip_prefix(project_root)
        .unwrap_or(file)
        .display()
        .to_string()
}
