//! `WORKDIR path`.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::argtext::strip_quotes;
use crate::ast::Instruction;
use crate::config::ValidatorSettings;
use crate::diagnostics::{format_message, Diagnostic, ErrorCode};

use super::{emit, require_at_least_one_argument};

static WINDOWS_ABSOLUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\$|([a-zA-Z](\$|:(\$|\\|/)))).*$").unwrap());

pub fn check(instr: &Instruction, settings: &ValidatorSettings, out: &mut Vec<Diagnostic>) {
    require_at_least_one_argument(instr, out);

    for arg in &instr.raw_arguments {
        let stripped = strip_quotes(&arg.value);
        let is_absolute = stripped.starts_with('/') || WINDOWS_ABSOLUTE_RE.is_match(stripped);
        if !is_absolute {
            emit(
                out,
                arg.range,
                settings.instruction_workdir_relative,
                ErrorCode::WorkdirIsNotAbsolute,
                format_message("WORKDIR \"${0}\" is not an absolute path", &[stripped]),
                instr.line,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parser::parse;

    #[test]
    fn test_absolute_path_ok() {
        let df = parse("FROM alpine\nWORKDIR /app");
        let mut out = Vec::new();
        check(&df.instructions[1], &ValidatorSettings::default(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_relative_path_flagged() {
        let df = parse("FROM alpine\nWORKDIR app");
        let mut out = Vec::new();
        check(&df.instructions[1], &ValidatorSettings::default(), &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::WorkdirIsNotAbsolute)));
    }

    #[test]
    fn test_variable_prefixed_path_ok() {
        let df = parse("FROM alpine\nWORKDIR $APP_HOME");
        let mut out = Vec::new();
        check(&df.instructions[1], &ValidatorSettings::default(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_windows_drive_path_ok() {
        let df = parse("FROM alpine\nWORKDIR C:\\app");
        let mut out = Vec::new();
        check(&df.instructions[1], &ValidatorSettings::default(), &mut out);
        assert!(out.is_empty());
    }
}
