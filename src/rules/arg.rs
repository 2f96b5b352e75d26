//! `ARG name[=default]`. At least one argument; multiple `ARG`s in one
//! instruction are tolerated.

use crate::ast::Instruction;
use crate::diagnostics::{Diagnostic, ErrorCode};
use crate::subengines::property::{self, PropertyError};

use super::{emit_intrinsic, require_at_least_one_argument};

pub fn check(instr: &Instruction, escape: char, out: &mut Vec<Diagnostic>) {
    require_at_least_one_argument(instr, out);

    for arg in &instr.raw_arguments {
        if let Err(err) = property::check(&arg.value, escape, false) {
            let code = match err {
                PropertyError::MissingNames => ErrorCode::SyntaxMissingNames,
                PropertyError::MissingSingleQuote => ErrorCode::SyntaxMissingSingleQuote,
                PropertyError::MissingDoubleQuote => ErrorCode::SyntaxMissingDoubleQuote,
                PropertyError::MissingValue => ErrorCode::SyntaxMissingEquals,
            };
            emit_intrinsic(out, arg.range, code, "Invalid ARG property shape", instr.line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parser::parse;

    #[test]
    fn test_valid_arg_with_default() {
        let df = parse("FROM alpine\nARG VERSION=18");
        let mut out = Vec::new();
        check(&df.instructions[1], '\\', &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_bare_arg_name_allowed() {
        let df = parse("FROM alpine\nARG VERSION");
        let mut out = Vec::new();
        check(&df.instructions[1], '\\', &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_arguments() {
        let df = parse("FROM alpine\nARG");
        let mut out = Vec::new();
        check(&df.instructions[1], '\\', &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::ArgumentRequiresAtLeastOne)));
    }

    #[test]
    fn test_unterminated_quoted_value() {
        let df = parse(r#"FROM alpine
ARG FOO="bar"#);
        let mut out = Vec::new();
        check(&df.instructions[1], '\\', &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::SyntaxMissingDoubleQuote)));
    }
}
