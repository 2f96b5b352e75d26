//! `SHELL ["executable", "param", ...]`. JSON form only.

use crate::ast::Instruction;
use crate::diagnostics::{Diagnostic, ErrorCode};

use super::emit_intrinsic;

pub fn check(instr: &Instruction, out: &mut Vec<Diagnostic>) {
    let Some(json) = &instr.json else {
        emit_intrinsic(
            out,
            instr.arguments_range,
            ErrorCode::ShellJsonForm,
            "SHELL requires a JSON array of strings",
            instr.line,
        );
        return;
    };

    if json.strings.is_empty() {
        emit_intrinsic(
            out,
            instr.arguments_range,
            ErrorCode::ShellRequiresOne,
            "SHELL requires at least one argument",
            instr.line,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parser::parse;

    #[test]
    fn test_valid_shell() {
        let df = parse(r#"SHELL ["/bin/sh", "-c"]"#);
        let mut out = Vec::new();
        check(&df.instructions[0], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_non_json_form_rejected() {
        let df = parse("SHELL /bin/sh -c");
        let mut out = Vec::new();
        check(&df.instructions[0], &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::ShellJsonForm)));
    }

    #[test]
    fn test_empty_array_rejected() {
        let df = parse("SHELL []");
        let mut out = Vec::new();
        check(&df.instructions[0], &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::ShellRequiresOne)));
    }

    #[test]
    fn test_escaped_quote_in_argument_accepted() {
        let df = parse(r#"SHELL ["a\"b", "-c"]"#);
        let mut out = Vec::new();
        check(&df.instructions[0], &mut out);
        assert!(out.is_empty());
    }
}
