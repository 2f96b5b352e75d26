use serde::Serialize;
use std::path::Path;

use super::CheckReport;
use crate::diagnostics::Severity;
use crate::position::Range;

#[derive(Serialize)]
struct JsonOutput<'a> {
    diagnostics: Vec<JsonDiagnostic<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    file: String,
    range: Range,
    severity: Severity,
    code: String,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonSummary {
    errors: usize,
    warnings: usize,
}

fn build_output(report: &CheckReport, project_root: &Path) -> JsonOutput<'_> {
    let mut diagnostics = Vec::new();
    for file in &report.files {
        let rel = super::relative_path(&file.path, project_root);
        for d in &file.diagnostics {
            diagnostics.push(JsonDiagnostic {
                file: rel.clone(),
                range: d.range,
                severity: d.severity,
                code: format!("{:?}", d.code),
                message: &d.message,
            });
        }
    }

    JsonOutput {
        diagnostics,
        summary: JsonSummary {
            errors: report.count(Severity::Error),
            warnings: report.count(Severity::Warning),
        },
    }
}

pub fn render(report: &CheckReport, project_root: &Path) {
    let output = build_output(report, project_root);
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
