use owo_colors::OwoColorize;
use std::path::Path;

use super::CheckReport;
use crate::diagnostics::Severity;

pub fn render(report: &CheckReport, project_root: &Path) {
    let total: usize = report.files.iter().map(|f| f.diagnostics.len()).sum();
    if total == 0 {
        println!();
        println!("  {}", "no issues found".green());
        println!();
        return;
    }

    println!();
    for file in &report.files {
        if file.diagnostics.is_empty() {
            continue;
        }
        println!("  {}", super::relative_path(&file.path, project_root).bold());
        for d in &file.diagnostics {
            let icon = match d.severity {
                Severity::Error => "\u{2717}".red().to_string(),
                Severity::Warning => "\u{26a0}".yellow().to_string(),
                Severity::Ignore => unreachable!("ignore severity is never emitted"),
            };
            println!(
                "    {} {}:{}  {}  {}",
                icon,
                d.range.start.line + 1,
                d.range.start.character + 1,
                d.message,
                format!("{:?}", d.code).dimmed(),
            );
        }
    }

    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);
    println!();
    let mut parts = Vec::new();
    if errors > 0 {
        parts.push(format!("{errors} errors").red().bold().to_string());
    }
    if warnings > 0 {
        parts.push(format!("{warnings} warnings").yellow().bold().to_string());
    }
    println!("  {}", parts.join(", "));
    println!();
}
