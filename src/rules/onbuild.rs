//! `ONBUILD <INSTRUCTION>`.

use crate::ast::Instruction;
use crate::config::ValidatorSettings;
use crate::diagnostics::{format_message, Diagnostic, ErrorCode};

use super::{emit_intrinsic, require_at_least_one_argument};

pub fn check(instr: &Instruction, settings: &ValidatorSettings, escape: char, out: &mut Vec<Diagnostic>) {
    require_at_least_one_argument(instr, out);

    let Some(trigger) = &instr.onbuild_trigger else {
        return;
    };

    if !super::check_instruction_keyword(trigger, settings, out) {
        return;
    }

    match trigger.keyword_upper().as_str() {
        "FROM" | "MAINTAINER" => {
            emit_intrinsic(
                out,
                trigger.keyword_range,
                ErrorCode::OnbuildTriggerDisallowed,
                format_message("${0} is not allowed as an ONBUILD trigger", &[&trigger.keyword_upper()]),
                instr.line,
            );
        }
        "ONBUILD" => {
            emit_intrinsic(
                out,
                trigger.keyword_range,
                ErrorCode::OnbuildChainingDisallowed,
                "Chaining ONBUILD instructions is not allowed",
                instr.line,
            );
        }
        _ => {
            super::dispatch(trigger, settings, escape, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parser::parse;

    #[test]
    fn test_valid_onbuild_run() {
        let df = parse("FROM alpine\nONBUILD RUN echo hi");
        let mut out = Vec::new();
        check(&df.instructions[1], &ValidatorSettings::default(), '\\', &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_onbuild_from_disallowed() {
        let df = parse("FROM alpine\nONBUILD FROM scratch");
        let mut out = Vec::new();
        check(&df.instructions[1], &ValidatorSettings::default(), '\\', &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::OnbuildTriggerDisallowed)));
    }

    #[test]
    fn test_onbuild_maintainer_disallowed() {
        let df = parse("FROM alpine\nONBUILD MAINTAINER me");
        let mut out = Vec::new();
        check(&df.instructions[1], &ValidatorSettings::default(), '\\', &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::OnbuildTriggerDisallowed)));
    }

    #[test]
    fn test_onbuild_chaining_disallowed() {
        let df = parse("FROM alpine\nONBUILD ONBUILD RUN echo hi");
        let mut out = Vec::new();
        check(&df.instructions[1], &ValidatorSettings::default(), '\\', &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::OnbuildChainingDisallowed)));
    }

    #[test]
    fn test_onbuild_recurses_into_trigger_rules() {
        let df = parse("FROM alpine\nONBUILD COPY src");
        let mut out = Vec::new();
        check(&df.instructions[1], &ValidatorSettings::default(), '\\', &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::ArgumentRequiresAtLeastTwo)));
    }

    #[test]
    fn test_onbuild_unknown_trigger_keyword_reported() {
        let df = parse("FROM alpine\nONBUILD FROBNICATE x");
        let mut out = Vec::new();
        check(&df.instructions[1], &ValidatorSettings::default(), '\\', &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::UnknownInstruction)));
    }

    #[test]
    fn test_onbuild_trigger_keyword_casing_reported() {
        let df = parse("FROM alpine\nONBUILD run echo hi");
        let mut out = Vec::new();
        check(&df.instructions[1], &ValidatorSettings::default(), '\\', &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::CasingInstruction)));
    }
}
