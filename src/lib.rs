//! Static analysis and formatting for Dockerfiles: a stateless,
//! synchronous library (`validate`, `format`, `format_range`,
//! `format_on_type`) plus a thin CLI front end in `bin/dockerlint`.

pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod formatter;
pub mod position;
pub mod rules;
pub mod subengines;

use config::{FormatterSettings, ValidatorSettings};
use diagnostics::Diagnostic;
use position::{Position, Range, TextEdit};

/// Lints `source` and returns diagnostics in emission order, with
/// ignore-comment suppression already applied.
pub fn validate(source: &str, settings: &ValidatorSettings) -> Vec<Diagnostic> {
    engine::validate(source, settings)
}

/// Computes the minimal, non-overlapping set of indentation/trailing-
/// whitespace edits for the whole document.
pub fn format(source: &str, settings: &FormatterSettings) -> Vec<TextEdit> {
    formatter::format(source, settings)
}

/// As `format`, restricted to the lines overlapping `range`.
pub fn format_range(source: &str, range: Range, settings: &FormatterSettings) -> Vec<TextEdit> {
    formatter::format_range(source, range, settings)
}

/// Format-on-type: `typed_char` was just inserted at `position`.
pub fn format_on_type(
    source: &str,
    position: Position,
    typed_char: char,
    escape: char,
    settings: &FormatterSettings,
) -> Vec<TextEdit> {
    formatter::format_on_type(source, position, typed_char, escape, settings)
}
