//! `ADD`/`COPY src... dest`.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::Instruction;
use crate::config::ValidatorSettings;
use crate::diagnostics::{Diagnostic, ErrorCode};

use super::{check_flags, emit_intrinsic, FlagKind, FlagSpec};

static FROM_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9].*$").unwrap());

const ADD_FLAGS: &[FlagSpec] = &[
    FlagSpec { name: "chmod", kind: FlagKind::ValueRequired },
    FlagSpec { name: "chown", kind: FlagKind::ValueRequired },
    FlagSpec { name: "checksum", kind: FlagKind::ValueRequired },
    FlagSpec { name: "keep-git-dir", kind: FlagKind::Boolean },
    FlagSpec { name: "link", kind: FlagKind::Boolean },
];

const COPY_FLAGS: &[FlagSpec] = &[
    FlagSpec { name: "chmod", kind: FlagKind::ValueRequired },
    FlagSpec { name: "chown", kind: FlagKind::ValueRequired },
    FlagSpec { name: "from", kind: FlagKind::ValueRequired },
    FlagSpec { name: "link", kind: FlagKind::Boolean },
];

pub fn check(instr: &Instruction, is_add: bool, settings: &ValidatorSettings, out: &mut Vec<Diagnostic>) {
    let (flags, unknown_code) = if is_add {
        (ADD_FLAGS, ErrorCode::UnknownAddFlag)
    } else {
        (COPY_FLAGS, ErrorCode::UnknownCopyFlag)
    };
    check_flags(&instr.flags, flags, unknown_code, instr.line, out);

    if !is_add {
        if let Some(from_flag) = instr.flags.iter().find(|f| f.name == "from") {
            if let Some(value) = &from_flag.value {
                if !FROM_VALUE_RE.is_match(value) {
                    emit_intrinsic(
                        out,
                        from_flag.value_range.unwrap_or(from_flag.range),
                        ErrorCode::FlagInvalidFromValue,
                        format!("Invalid value \"{value}\" for flag \"from\""),
                        instr.line,
                    );
                }
            }
        }
    }

    let min_args = if instr.json.is_some() {
        instr.json.as_ref().map_or(0, |j| j.strings.len())
    } else {
        instr.raw_arguments.len()
    };
    if min_args < 2 {
        emit_intrinsic(
            out,
            instr.arguments_range,
            ErrorCode::ArgumentRequiresAtLeastTwo,
            format!("{} requires at least two arguments", instr.keyword_upper()),
            instr.line,
        );
        return;
    }

    let uses_heredoc = !instr.heredocs.is_empty();
    if instr.raw_arguments.len() > 2 && !uses_heredoc {
        let dest = instr.raw_arguments.last().unwrap();
        let ends_with_separator = dest.value.ends_with('/') || dest.value.ends_with('\\');
        let abuts_variable = instr
            .variables
            .iter()
            .any(|v| v.range.end == dest.range.end || v.range.end.character + 1 == dest.range.end.character);
        if !ends_with_separator && !abuts_variable {
            emit_intrinsic(
                out,
                dest.range,
                ErrorCode::InvalidDestination,
                "Multiple sources require the destination to end with '/'",
                instr.line,
            );
        }
    }

    super::check_json_in_single_quotes(instr, settings.instruction_json_in_single_quotes, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parser::parse;

    #[test]
    fn test_valid_copy() {
        let df = parse("COPY src dst");
        let mut out = Vec::new();
        check(&df.instructions[0], false, &ValidatorSettings::default(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_requires_at_least_two() {
        let df = parse("COPY src");
        let mut out = Vec::new();
        check(&df.instructions[0], false, &ValidatorSettings::default(), &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::ArgumentRequiresAtLeastTwo)));
    }

    #[test]
    fn test_multiple_sources_require_trailing_slash() {
        let df = parse("COPY a b c");
        let mut out = Vec::new();
        check(&df.instructions[0], false, &ValidatorSettings::default(), &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::InvalidDestination)));
    }

    #[test]
    fn test_multiple_sources_with_trailing_slash_ok() {
        let df = parse("COPY a b c/");
        let mut out = Vec::new();
        check(&df.instructions[0], false, &ValidatorSettings::default(), &mut out);
        assert!(!out.iter().any(|d| matches!(d.code, ErrorCode::InvalidDestination)));
    }

    #[test]
    fn test_unknown_add_flag() {
        let df = parse("ADD --bogus=1 src dst");
        let mut out = Vec::new();
        check(&df.instructions[0], true, &ValidatorSettings::default(), &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::UnknownAddFlag)));
    }

    #[test]
    fn test_invalid_from_value() {
        let df = parse("COPY --from=^abc . .");
        let mut out = Vec::new();
        check(&df.instructions[0], false, &ValidatorSettings::default(), &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::FlagInvalidFromValue)));
    }

    #[test]
    fn test_heredoc_source_skips_destination_check() {
        let df = parse("COPY <<EOF a b\ncontent\nEOF");
        let mut out = Vec::new();
        check(&df.instructions[0], false, &ValidatorSettings::default(), &mut out);
        assert!(!out.iter().any(|d| matches!(d.code, ErrorCode::InvalidDestination)));
    }

    #[test]
    fn test_json_in_single_quotes_honors_ignore_setting() {
        let df = parse("ADD ['a.txt', 'b.txt'] dst");
        let mut out = Vec::new();
        let mut settings = ValidatorSettings::default();
        settings.instruction_json_in_single_quotes = crate::diagnostics::Severity::Ignore;
        check(&df.instructions[0], true, &settings, &mut out);
        assert!(out
            .iter()
            .all(|d| !matches!(d.code, ErrorCode::JsonInSingleQuotes) || d.severity == crate::diagnostics::Severity::Ignore));
    }
}
