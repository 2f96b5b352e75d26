//! Per-keyword rule bodies. Each function takes an `Instruction` view,
//! the resolved settings, and the document's escape character, and
//! appends to the shared diagnostic accumulator — never returns its own
//! list, matching the "mutable accumulator passed explicitly" design.

pub mod add_copy;
pub mod arg;
pub mod env_label;
pub mod expose;
pub mod from;
pub mod healthcheck;
pub mod onbuild;
pub mod shell;
pub mod stopsignal;
pub mod workdir;

use crate::ast::{Flag, Instruction};
use crate::config::ValidatorSettings;
use crate::diagnostics::{format_message, Diagnostic, DiagnosticTag, ErrorCode, Severity};
use crate::position::Range;

pub(crate) const KNOWN_KEYWORDS: &[&str] = &[
    "FROM", "RUN", "CMD", "LABEL", "MAINTAINER", "EXPOSE", "ENV", "ADD", "COPY", "ENTRYPOINT",
    "VOLUME", "USER", "WORKDIR", "ARG", "ONBUILD", "STOPSIGNAL", "HEALTHCHECK", "SHELL",
];

/// Keyword-level checks (unknown keyword, casing, deprecated
/// `MAINTAINER`), shared by the top-level instruction loop and by
/// `ONBUILD`'s recursion into its trigger. Returns `false` for an
/// unrecognized keyword — callers must skip rule-body dispatch in that
/// case, since `UnknownInstruction` is meant to be the sole diagnostic
/// attributable to the keyword token.
pub(crate) fn check_instruction_keyword(instr: &Instruction, settings: &ValidatorSettings, out: &mut Vec<Diagnostic>) -> bool {
    let upper = instr.keyword_upper();
    if !KNOWN_KEYWORDS.contains(&upper.as_str()) {
        out.push(
            Diagnostic::new(
                instr.keyword_range,
                ErrorCode::UnknownInstruction.intrinsic_severity(),
                ErrorCode::UnknownInstruction,
                format_message("Unknown instruction \"${0}\"", &[&instr.keyword]),
            )
            .with_instruction_line(Some(instr.line)),
        );
        return false;
    }

    if instr.keyword != upper {
        out.push(
            Diagnostic::new(
                instr.keyword_range,
                settings.instruction_casing,
                ErrorCode::CasingInstruction,
                format_message("Instruction \"${0}\" should be uppercase", &[&instr.keyword]),
            )
            .with_instruction_line(Some(instr.line)),
        );
    }

    if upper == "MAINTAINER" {
        out.push(
            Diagnostic::new(
                instr.keyword_range,
                settings.deprecated_maintainer,
                ErrorCode::DeprecatedMaintainer,
                "MAINTAINER is deprecated, use a LABEL instead",
            )
            .with_instruction_line(Some(instr.line))
            .with_tag(DiagnosticTag::Deprecated),
        );
    }

    true
}

pub(crate) fn emit(
    out: &mut Vec<Diagnostic>,
    range: Range,
    severity: Severity,
    code: ErrorCode,
    message: impl Into<String>,
    instruction_line: u32,
) {
    out.push(
        Diagnostic::new(range, severity, code, message.into())
            .with_instruction_line(Some(instruction_line)),
    );
}

pub(crate) fn emit_intrinsic(
    out: &mut Vec<Diagnostic>,
    range: Range,
    code: ErrorCode,
    message: impl Into<String>,
    instruction_line: u32,
) {
    emit(out, range, code.intrinsic_severity(), code, message, instruction_line);
}

/// `RUN`, `CMD`, `ENTRYPOINT`, `VOLUME`, `USER`, and unrecognized keywords
/// with no dedicated rule set only need "at least one argument" plus the
/// JSON-in-single-quotes detector (the latter applied by the caller).
pub(crate) fn require_at_least_one_argument(instr: &Instruction, out: &mut Vec<Diagnostic>) {
    if instr.raw_arguments.is_empty() {
        emit_intrinsic(
            out,
            instr.arguments_range,
            ErrorCode::ArgumentRequiresAtLeastOne,
            format_message("${0} requires at least one argument", &[&instr.keyword_upper()]),
            instr.line,
        );
    }
}

pub(crate) fn check_json_in_single_quotes(
    instr: &Instruction,
    severity: Severity,
    out: &mut Vec<Diagnostic>,
) {
    let text = instr.arguments_range;
    let raw = instr
        .raw_arguments
        .first()
        .map(|_| joined_argument_text(instr))
        .unwrap_or_default();
    if crate::subengines::json_single_quotes::looks_like_json_in_single_quotes(&raw) {
        emit(
            out,
            text,
            severity,
            ErrorCode::JsonInSingleQuotes,
            "JSON arguments must use double quotes",
            instr.line,
        );
    }
}

/// Reconstructs the instruction's argument text from token values, purely
/// for the single-quoted-JSON structural scan (which does not need exact
/// source ranges, only the token/comma shape). Shell-form tokenization
/// splits on whitespace without stripping a bracket/comma-adjacent quote
/// (`strip_quotes` only fires when a token's own start and end match), so
/// a token like `['a',` already carries its source comma — joining with a
/// single space reproduces the original bracket text; joining with ", "
/// would double it up and break the scan on anything past one element.
fn joined_argument_text(instr: &Instruction) -> String {
    instr
        .raw_arguments
        .iter()
        .map(|a| a.value.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) enum FlagKind {
    Boolean,
    ValueRequired,
}

pub(crate) struct FlagSpec {
    pub name: &'static str,
    pub kind: FlagKind,
}

/// Shared duplicate/unknown/missing-value/boolean-shape flag validation.
pub(crate) fn check_flags(
    flags: &[Flag],
    specs: &[FlagSpec],
    unknown_code: ErrorCode,
    instruction_line: u32,
    out: &mut Vec<Diagnostic>,
) {
    let mut seen: Vec<&str> = Vec::new();
    for flag in flags {
        if seen.contains(&flag.name.as_str()) {
            emit_intrinsic(
                out,
                flag.range,
                ErrorCode::FlagDuplicate,
                format_message("Duplicate flag \"${0}\"", &[&flag.name]),
                instruction_line,
            );
        }
        seen.push(flag.name.as_str());

        let Some(spec) = specs.iter().find(|s| s.name == flag.name) else {
            emit_intrinsic(
                out,
                flag.name_range,
                unknown_code,
                format_message("Unknown flag \"${0}\"", &[&flag.name]),
                instruction_line,
            );
            continue;
        };
        match spec.kind {
            FlagKind::Boolean => {
                if let Some(value) = &flag.value {
                    if !value.is_empty() && !value.eq_ignore_ascii_case("true") && !value.eq_ignore_ascii_case("false") {
                        emit_intrinsic(
                            out,
                            flag.value_range.unwrap_or(flag.range),
                            ErrorCode::FlagExpectedBooleanValue,
                            format_message("Expected a boolean value for flag \"${0}\"", &[&flag.name]),
                            instruction_line,
                        );
                    }
                }
            }
            FlagKind::ValueRequired => {
                if flag.value.is_none() {
                    emit_intrinsic(
                        out,
                        flag.range,
                        ErrorCode::FlagMissingValue,
                        format_message("Flag \"${0}\" requires a value", &[&flag.name]),
                        instruction_line,
                    );
                }
            }
        }
    }
}

/// Dispatches to the keyword-specific rule body. Callers must gate this
/// on `check_instruction_keyword` returning `true` first — an
/// unrecognized keyword has no rule body here, only `UnknownInstruction`.
pub fn dispatch(
    instr: &Instruction,
    settings: &ValidatorSettings,
    escape: char,
    out: &mut Vec<Diagnostic>,
) {
    match instr.keyword_upper().as_str() {
        "FROM" => from::check(instr, out),
        "ADD" => add_copy::check(instr, true, settings, out),
        "COPY" => add_copy::check(instr, false, settings, out),
        "ARG" => arg::check(instr, escape, out),
        "ENV" | "LABEL" => env_label::check(instr, escape, out),
        "EXPOSE" => expose::check(instr, out),
        "HEALTHCHECK" => healthcheck::check(instr, settings, out),
        "ONBUILD" => onbuild::check(instr, settings, escape, out),
        "SHELL" => shell::check(instr, out),
        "STOPSIGNAL" => stopsignal::check(instr, out),
        "WORKDIR" => workdir::check(instr, settings, out),
        "RUN" | "CMD" | "ENTRYPOINT" | "VOLUME" => {
            check_json_in_single_quotes(instr, settings.instruction_json_in_single_quotes, out);
        }
        "USER" | "MAINTAINER" => {
            require_at_least_one_argument(instr, out);
        }
        _ => {
            require_at_least_one_argument(instr, out);
        }
    }
}
