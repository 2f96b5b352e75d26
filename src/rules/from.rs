//! `FROM image[:tag|@digest] [AS name]`.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::Instruction;
use crate::diagnostics::{format_message, Diagnostic, ErrorCode};
use crate::subengines::image_reference;

use super::{check_flags, emit_intrinsic, FlagKind, FlagSpec};

static BARE_VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{?[A-Za-z_][A-Za-z0-9_]*\}?$").unwrap());
static STAGE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]([a-z0-9_\-.]*)?$").unwrap());

const FLAGS: &[FlagSpec] = &[FlagSpec {
    name: "platform",
    kind: FlagKind::ValueRequired,
}];

pub fn check(instr: &Instruction, out: &mut Vec<Diagnostic>) {
    check_flags(&instr.flags, FLAGS, ErrorCode::UnknownFromFlag, instr.line, out);

    let args = &instr.raw_arguments;
    if args.len() != 1 && args.len() != 3 {
        let trailing_start = args.get(1).map_or(instr.arguments_range, |a| a.range);
        let trailing_end = args.last().map_or(trailing_start, |a| a.range);
        let range = crate::position::Range::new(trailing_start.start, trailing_end.end);
        emit_intrinsic(
            out,
            if args.len() > 1 { range } else { instr.arguments_range },
            ErrorCode::ArgumentRequiresOneOrThree,
            "FROM requires one or three arguments",
            instr.line,
        );
    }

    if let Some(image) = args.first() {
        let is_bare_variable = BARE_VARIABLE_RE.is_match(&image.value);
        let expanded = instr.expanded_arguments.first().map(|a| a.value.as_str()).unwrap_or(&image.value);
        if is_bare_variable && expanded == image.value {
            emit_intrinsic(
                out,
                image.range,
                ErrorCode::BaseNameEmpty,
                "Base image name is empty",
                instr.line,
            );
        } else if let Some(info) = &instr.from_info {
            if let Some(tag_range) = info.tag_range {
                if !image_reference::is_valid_tag(&tag_text(image.value.as_str(), info)) {
                    let range = if tag_range.start != tag_range.end { tag_range } else { image.range };
                    emit_intrinsic(
                        out,
                        range,
                        ErrorCode::InvalidReferenceFormat,
                        format_message("Tag \"${0}\" is not a valid tag", &[&tag_text(image.value.as_str(), info)]),
                        instr.line,
                    );
                }
            }
            if let Some(digest_range) = info.digest_range {
                if !image_reference::is_valid_digest(&digest_text(image.value.as_str(), info)) {
                    let range = if digest_range.start != digest_range.end { digest_range } else { image.range };
                    emit_intrinsic(
                        out,
                        range,
                        ErrorCode::InvalidReferenceFormat,
                        "Invalid digest format",
                        instr.line,
                    );
                }
            }
        }
    }

    if let Some(as_kw) = args.get(1) {
        if !as_kw.value.eq_ignore_ascii_case("AS") {
            emit_intrinsic(
                out,
                as_kw.range,
                ErrorCode::InvalidAs,
                "Expected keyword \"AS\"",
                instr.line,
            );
        }
    }

    if let Some(name) = args.get(2) {
        if !STAGE_NAME_RE.is_match(&name.value.to_ascii_lowercase()) {
            emit_intrinsic(
                out,
                name.range,
                ErrorCode::InvalidBuildStageName,
                format_message("Invalid build stage name \"${0}\"", &[&name.value]),
                instr.line,
            );
        }
    }
}

/// The image argument's own sub-ranges are relative to the whole
/// document; this pulls the substring of `image_value` they denote by
/// re-deriving the same split `ast::parser::build_from_info` used.
fn tag_text(image_value: &str, info: &crate::ast::FromInfo) -> String {
    let _ = info;
    image_value
        .rsplit_once(':')
        .map(|(_, tag)| tag.to_string())
        .unwrap_or_default()
}

fn digest_text(image_value: &str, info: &crate::ast::FromInfo) -> String {
    let _ = info;
    image_value
        .split_once('@')
        .map(|(_, digest)| digest.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parser::parse;

    #[test]
    fn test_valid_from_single_arg() {
        let df = parse("FROM alpine:latest");
        let mut out = Vec::new();
        check(&df.instructions[0], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_tag() {
        let df = parse(&format!("FROM alpine:{}", "a".repeat(129)));
        let mut out = Vec::new();
        check(&df.instructions[0], &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::InvalidReferenceFormat)));
    }

    #[test]
    fn test_invalid_as_keyword() {
        let df = parse("FROM alpine XS build");
        let mut out = Vec::new();
        check(&df.instructions[0], &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::InvalidAs)));
    }

    #[test]
    fn test_invalid_stage_name() {
        let df = parse("FROM alpine AS Build_Name!");
        let mut out = Vec::new();
        check(&df.instructions[0], &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::InvalidBuildStageName)));
    }

    #[test]
    fn test_wrong_argument_count() {
        let df = parse("FROM alpine AS build extra");
        let mut out = Vec::new();
        check(&df.instructions[0], &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::ArgumentRequiresOneOrThree)));
    }

    #[test]
    fn test_unknown_flag() {
        let df = parse("FROM --foo=bar alpine");
        let mut out = Vec::new();
        check(&df.instructions[0], &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::UnknownFromFlag)));
    }
}
