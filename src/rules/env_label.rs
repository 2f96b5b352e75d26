//! `ENV`/`LABEL key=value...`.

use crate::ast::Instruction;
use crate::diagnostics::{Diagnostic, ErrorCode};
use crate::subengines::property::{self, PropertyError};

use super::{emit_intrinsic, require_at_least_one_argument};

pub fn check(instr: &Instruction, escape: char, out: &mut Vec<Diagnostic>) {
    require_at_least_one_argument(instr, out);
    let is_env = instr.keyword_upper() == "ENV";

    for (index, arg) in instr.raw_arguments.iter().enumerate() {
        if let Err(err) = property::check(&arg.value, escape, true) {
            let code = match err {
                PropertyError::MissingNames => ErrorCode::SyntaxMissingNames,
                PropertyError::MissingSingleQuote => ErrorCode::SyntaxMissingSingleQuote,
                PropertyError::MissingDoubleQuote => ErrorCode::SyntaxMissingDoubleQuote,
                PropertyError::MissingValue if index == 0 && is_env => ErrorCode::ArgumentRequiresTwo,
                PropertyError::MissingValue => ErrorCode::SyntaxMissingEquals,
            };
            emit_intrinsic(
                out,
                arg.range,
                code,
                format!("Invalid {} property shape", instr.keyword_upper()),
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
    fn test_valid_env() {
        let df = parse("FROM alpine\nENV FOO=bar BAZ=qux");
        let mut out = Vec::new();
        check(&df.instructions[1], '\\', &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_env_first_property_missing_equals() {
        let df = parse("FROM alpine\nENV FOO");
        let mut out = Vec::new();
        check(&df.instructions[1], '\\', &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::ArgumentRequiresTwo)));
    }

    #[test]
    fn test_label_missing_equals_uses_generic_code() {
        let df = parse("FROM alpine\nLABEL FOO");
        let mut out = Vec::new();
        check(&df.instructions[1], '\\', &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::SyntaxMissingEquals)));
    }

    #[test]
    fn test_empty_name_missing_names() {
        let df = parse("FROM alpine\nENV =bar");
        let mut out = Vec::new();
        check(&df.instructions[1], '\\', &mut out);
        assert!(out.iter().any(|d| matches!(d.code, ErrorCode::SyntaxMissingNames)));
    }
}
