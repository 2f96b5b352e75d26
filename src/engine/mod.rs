//! The validator engine: the nine-step algorithm that turns a parsed
//! `Dockerfile` into the final, suppression-applied diagnostic list.
//! `validate` is the crate's single stateless entry point for linting.

use std::collections::HashSet;

use crate::ast::parser;
use crate::ast::{Dockerfile, Instruction};
use crate::config::ValidatorSettings;
use crate::diagnostics::{format_message, Diagnostic, DiagnosticTag, ErrorCode, Severity};
use crate::position::{Position, Range, TextIndex};
use crate::rules;

pub fn validate(source: &str, settings: &ValidatorSettings) -> Vec<Diagnostic> {
    let df = parser::parse(source);
    let idx = TextIndex::new(source);
    let mut out = Vec::new();

    check_directives(&df, settings, &mut out);
    check_source_image(&df, &mut out);
    check_stage_multiples(&df, settings, &mut out);
    check_duplicate_stage_names(&df, &mut out);

    for instr in &df.instructions {
        let known = rules::check_instruction_keyword(instr, settings, &mut out);
        if known {
            rules::dispatch(instr, settings, df.escape_char, &mut out);
        }
        check_empty_continuation_lines(instr, &idx, df.escape_char, settings, &mut out);
        check_variable_modifiers(instr, &mut out);
    }

    apply_suppression(&df, out)
}

fn emit_doc(out: &mut Vec<Diagnostic>, range: Range, severity: Severity, code: ErrorCode, message: impl Into<String>) {
    out.push(Diagnostic::new(range, severity, code, message.into()));
}

/// Step 1: directive pass.
fn check_directives(df: &Dockerfile, settings: &ValidatorSettings, out: &mut Vec<Diagnostic>) {
    let mut seen_escape = false;
    for d in &df.directives {
        if d.name.eq_ignore_ascii_case("escape") {
            if seen_escape {
                emit_doc(
                    out,
                    d.name_range,
                    ErrorCode::DuplicatedEscapeDirective.intrinsic_severity(),
                    ErrorCode::DuplicatedEscapeDirective,
                    "Only the first escape directive is honored",
                );
            }
            seen_escape = true;
            if !(d.value == "\\" || d.value == "`" || d.value.is_empty()) {
                emit_doc(
                    out,
                    d.value_range,
                    ErrorCode::InvalidEscapeDirective.intrinsic_severity(),
                    ErrorCode::InvalidEscapeDirective,
                    format_message("Invalid escape directive value \"${0}\"", &[&d.value]),
                );
            }
        }
        if d.name.chars().any(|c| c.is_ascii_uppercase()) {
            emit_doc(
                out,
                d.name_range,
                settings.directive_casing,
                ErrorCode::CasingDirective,
                format_message("Directive \"${0}\" should be lowercase", &[&d.name]),
            );
        }
    }
}

/// Step 2: source-image presence.
fn check_source_image(df: &Dockerfile, out: &mut Vec<Diagnostic>) {
    let has_non_arg = df.instructions.iter().any(|i| i.keyword_upper() != "ARG");
    if !has_non_arg {
        emit_doc(
            out,
            Range::new(Position::new(0, 0), Position::new(0, 0)),
            ErrorCode::NoSourceImage.intrinsic_severity(),
            ErrorCode::NoSourceImage,
            "No source image provided with FROM",
        );
        return;
    }
    for instr in &df.instructions {
        match instr.keyword_upper().as_str() {
            "ARG" => continue,
            "FROM" => return,
            _ => {
                emit_doc(
                    out,
                    instr.keyword_range,
                    ErrorCode::NoSourceImage.intrinsic_severity(),
                    ErrorCode::NoSourceImage,
                    "No source image provided with FROM",
                );
                return;
            }
        }
    }
}

/// Step 3: per-build-stage CMD/ENTRYPOINT/HEALTHCHECK multiples.
fn check_stage_multiples(df: &Dockerfile, settings: &ValidatorSettings, out: &mut Vec<Diagnostic>) {
    let mut cmd: Vec<&Instruction> = Vec::new();
    let mut entrypoint: Vec<&Instruction> = Vec::new();
    let mut healthcheck: Vec<&Instruction> = Vec::new();

    let flush = |cmd: &mut Vec<&Instruction>,
                 entrypoint: &mut Vec<&Instruction>,
                 healthcheck: &mut Vec<&Instruction>,
                 out: &mut Vec<Diagnostic>| {
        flush_bucket(cmd, settings.instruction_cmd_multiple, out);
        flush_bucket(entrypoint, settings.instruction_entrypoint_multiple, out);
        flush_bucket(healthcheck, settings.instruction_healthcheck_multiple, out);
        cmd.clear();
        entrypoint.clear();
        healthcheck.clear();
    };

    for instr in &df.instructions {
        match instr.keyword_upper().as_str() {
            "FROM" => flush(&mut cmd, &mut entrypoint, &mut healthcheck, out),
            "CMD" => cmd.push(instr),
            "ENTRYPOINT" => entrypoint.push(instr),
            "HEALTHCHECK" => healthcheck.push(instr),
            _ => {}
        }
    }
    flush(&mut cmd, &mut entrypoint, &mut healthcheck, out);
}

fn flush_bucket(bucket: &[&Instruction], severity: Severity, out: &mut Vec<Diagnostic>) {
    if bucket.len() < 2 {
        return;
    }
    for instr in &bucket[..bucket.len() - 1] {
        out.push(
            Diagnostic::new(
                instr.keyword_range,
                severity,
                ErrorCode::MultipleInstructions,
                format_message("Multiple ${0} instructions", &[&instr.keyword_upper()]),
            )
            .with_instruction_line(Some(instr.line))
            .with_tag(DiagnosticTag::Unnecessary),
        );
    }
}

/// Step 4: duplicate build-stage names, compared case-insensitively.
fn check_duplicate_stage_names(df: &Dockerfile, out: &mut Vec<Diagnostic>) {
    let names: Vec<(String, Range, u32)> = df
        .instructions
        .iter()
        .filter(|i| i.keyword_upper() == "FROM")
        .filter_map(|i| i.raw_arguments.get(2).map(|a| (a.value.to_ascii_lowercase(), a.range, i.line)))
        .collect();

    for (name, range, line) in &names {
        let count = names.iter().filter(|(n, _, _)| n == name).count();
        if count >= 2 {
            out.push(
                Diagnostic::new(
                    *range,
                    ErrorCode::DuplicateBuildStageName.intrinsic_severity(),
                    ErrorCode::DuplicateBuildStageName,
                    format_message("Duplicate build stage name \"${0}\"", &[name]),
                )
                .with_instruction_line(Some(*line)),
            );
        }
    }
}

/// Step 6: blank lines inside a multi-line instruction's continuation,
/// excluding heredoc content lines. A maximal run of consecutive blank
/// lines gets one diagnostic, spanning from the first blank line's start
/// to the start of the line after the last blank.
fn check_empty_continuation_lines(
    instr: &Instruction,
    idx: &TextIndex,
    escape: char,
    settings: &ValidatorSettings,
    out: &mut Vec<Diagnostic>,
) {
    let first = *instr.line_span.start();
    let last = *instr.line_span.end();
    if first == last {
        return;
    }

    let is_heredoc_line = |line: u32| {
        instr.heredocs.iter().any(|hd| {
            hd.content_range.is_some_and(|cr| line >= cr.start.line && line <= cr.end.line)
        })
    };
    let is_blank = |line: u32| {
        let content = idx.line_content(line);
        let without_escape = content.strip_suffix(escape).unwrap_or(content);
        without_escape.trim().is_empty()
    };

    let mut run_start: Option<u32> = None;
    for line in (first + 1)..=last {
        if is_heredoc_line(line) {
            continue;
        }
        if is_blank(line) {
            run_start.get_or_insert(line);
        } else if let Some(start) = run_start.take() {
            push_empty_continuation_run(instr, start, line, settings, out);
        }
    }
    if let Some(start) = run_start {
        push_empty_continuation_run(instr, start, last + 1, settings, out);
    }
}

fn push_empty_continuation_run(
    instr: &Instruction,
    first_blank: u32,
    line_after_last_blank: u32,
    settings: &ValidatorSettings,
    out: &mut Vec<Diagnostic>,
) {
    out.push(
        Diagnostic::new(
            Range::new(Position::new(first_blank, 0), Position::new(line_after_last_blank, 0)),
            settings.empty_continuation_line,
            ErrorCode::EmptyContinuationLine,
            "Empty continuation line",
        )
        .with_instruction_line(Some(instr.line)),
    );
}

/// Step 7: variable modifier validity, skipped for `RUN`/`CMD`/`ENTRYPOINT`
/// whose arguments are handed to the shell/exec form verbatim.
fn check_variable_modifiers(instr: &Instruction, out: &mut Vec<Diagnostic>) {
    if matches!(instr.keyword_upper().as_str(), "RUN" | "CMD" | "ENTRYPOINT") {
        return;
    }
    for v in &instr.variables {
        let Some(modifier) = &v.modifier else { continue };
        let first = modifier.chars().next();
        let valid = matches!(first, Some('+') | Some('-') | Some('?'));
        if !valid {
            let range = if modifier.is_empty() { v.range } else { v.modifier_range.unwrap_or(v.range) };
            out.push(
                Diagnostic::new(
                    range,
                    ErrorCode::UnsupportedModifier.intrinsic_severity(),
                    ErrorCode::UnsupportedModifier,
                    format_message("Unsupported modifier \"${0}\" for variable \"${1}\"", &[modifier, &v.name]),
                )
                .with_instruction_line(Some(instr.line)),
            );
        }
    }
}

/// Step 8/9: a comment that is exactly `dockerfile-utils: ignore`
/// suppresses diagnostics whose `instruction_line` equals the comment's
/// line + 1. Diagnostics with no `instruction_line` (directive/document
/// level) are never suppressed. Already in emission order.
fn apply_suppression(df: &Dockerfile, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let ignore_lines: HashSet<u32> = df
        .comments
        .iter()
        .filter(|c| c.content == "dockerfile-utils: ignore")
        .map(|c| c.range.start.line + 1)
        .collect();

    diagnostics
        .into_iter()
        .filter(|d| match d.instruction_line {
            Some(line) => !ignore_lines.contains(&line),
            None => true,
        })
        .collect()
}
