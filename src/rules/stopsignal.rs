//! `STOPSIGNAL signal`.

use crate::ast::Instruction;
use crate::diagnostics::{format_message, Diagnostic, ErrorCode};

use super::emit_intrinsic;

pub fn check(instr: &Instruction, out: &mut Vec<Diagnostic>) {
    if instr.raw_arguments.len() != 1 {
        emit_intrinsic(
            out,
            instr.arguments_range,
            ErrorCode::ArgumentRequiresOne,
            "STOPSIGNAL requires exactly one argument",
            instr.line,
        );
        return;
    }

    let arg = &instr.raw_arguments[0];
    let expanded = instr.expanded_arguments.first().map(|a| a.value.as_str()).unwrap_or(&arg.value);
    let valid = expanded.starts_with("SIG") || expanded.contains('$') || expanded.chars().all(|c| c.is_ascii_digit());
    if !valid {
        let reported = if expanded.contains('$') { String::new() } else { expanded.to_string() };
        emit_intrinsic(
            out,
            arg.range,
            ErrorCode::InvalidSignal,
            format_message("Invalid signal \"${0}\"", &[&reported]),
            instr.line,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parser::parse;

    #[test]
    fn test_valid_sig_name() {
        let df = parse("FROM alpine\nSTOPSIGNAL SIGKILL");
        let mut out = Vec::new();
        check(&df.instructions[1], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_valid_numeric() {
        let df = parse("FROM alpine\nSTOPSIGNAL 9");
        let mut out = Vec::new();
        check(&df.instructions[1], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_signal() {
        let df = parse("FROM alpine\nSTOPSIGNAL BOGUS");
        let mut out = Vec::new();
        check(&df.instructions[1], &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::InvalidSignal)));
    }

    #[test]
    fn test_wrong_argument_count() {
        let df = parse("FROM alpine\nSTOPSIGNAL 9 extra");
        let mut out = Vec::new();
        check(&df.instructions[1], &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::ArgumentRequiresOne)));
    }
}
