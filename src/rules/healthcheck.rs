//! `HEALTHCHECK [flags] CMD command` / `HEALTHCHECK NONE`.

use crate::ast::Instruction;
use crate::config::ValidatorSettings;
use crate::diagnostics::{format_message, Diagnostic, ErrorCode};
use crate::subengines::duration::{self, DurationError};

use super::{check_flags, emit_intrinsic, require_at_least_one_argument, FlagKind, FlagSpec};

const FLAGS: &[FlagSpec] = &[
    FlagSpec { name: "interval", kind: FlagKind::ValueRequired },
    FlagSpec { name: "retries", kind: FlagKind::ValueRequired },
    FlagSpec { name: "start-period", kind: FlagKind::ValueRequired },
    FlagSpec { name: "timeout", kind: FlagKind::ValueRequired },
    FlagSpec { name: "start-interval", kind: FlagKind::ValueRequired },
];

pub fn check(instr: &Instruction, settings: &ValidatorSettings, out: &mut Vec<Diagnostic>) {
    require_at_least_one_argument(instr, out);
    check_flags(&instr.flags, FLAGS, ErrorCode::UnknownHealthcheckFlag, instr.line, out);

    for flag in &instr.flags {
        if flag.name == "retries" {
            if let Some(value) = &flag.value {
                match value.parse::<i64>() {
                    Ok(n) if n < 1 => {
                        emit_intrinsic(
                            out,
                            flag.value_range.unwrap_or(flag.range),
                            ErrorCode::FlagAtLeastOne,
                            "retries must be at least 1",
                            instr.line,
                        );
                    }
                    Ok(_) => {}
                    Err(_) => {
                        emit_intrinsic(
                            out,
                            flag.value_range.unwrap_or(flag.range),
                            ErrorCode::InvalidSyntax,
                            format_message("Invalid value \"${0}\" for flag \"retries\"", &[value]),
                            instr.line,
                        );
                    }
                }
            }
        } else if matches!(flag.name.as_str(), "interval" | "start-period" | "timeout" | "start-interval") {
            if let Some(value) = &flag.value {
                if let Err(err) = duration::validate(value) {
                    let range = flag.value_range.unwrap_or(flag.range);
                    let code = match err {
                        DurationError::MissingDuration => ErrorCode::FlagMissingDuration,
                        DurationError::InvalidDuration => ErrorCode::FlagInvalidDuration,
                        DurationError::UnknownUnit(_) => ErrorCode::FlagUnknownUnit,
                        DurationError::LessThan1Ms => ErrorCode::FlagLessThan1ms,
                    };
                    emit_intrinsic(
                        out,
                        range,
                        code,
                        format_message("Invalid duration \"${0}\" for flag \"${1}\"", &[value, &flag.name]),
                        instr.line,
                    );
                }
            }
        }
    }

    if let Some(first) = instr.raw_arguments.first() {
        let kind = first.value.to_ascii_uppercase();
        match kind.as_str() {
            "NONE" => {
                if instr.raw_arguments.len() > 1 {
                    let extra = &instr.raw_arguments[1];
                    let last = instr.raw_arguments.last().unwrap();
                    let range = crate::position::Range::new(extra.range.start, last.range.end);
                    emit_intrinsic(
                        out,
                        range,
                        ErrorCode::ArgumentUnnecessary,
                        "NONE takes no further arguments",
                        instr.line,
                    );
                }
            }
            "CMD" => {
                if instr.raw_arguments.len() < 2 && instr.json.is_none() {
                    emit_intrinsic(
                        out,
                        first.range,
                        ErrorCode::HealthcheckCmdArgumentMissing,
                        "CMD requires a command",
                        instr.line,
                    );
                }
            }
            other => {
                emit_intrinsic(
                    out,
                    first.range,
                    ErrorCode::UnknownType,
                    format_message("Unknown HEALTHCHECK type \"${0}\"", &[other]),
                    instr.line,
                );
            }
        }
    }
}
