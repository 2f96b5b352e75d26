//! Diagnostic model: severities, stable error codes, message templates,
//! and the `Diagnostic` record shape.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::position::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[clap(rename_all = "lowercase")]
pub enum Severity {
    Ignore,
    Warning,
    Error,
}

impl Severity {
    /// Editor-protocol convention: 1=Error, 2=Warning. `Ignore` has no
    /// wire representation since it is never emitted.
    pub const fn wire_value(self) -> Option<u8> {
        match self {
            Severity::Error => Some(1),
            Severity::Warning => Some(2),
            Severity::Ignore => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPER_CASE")]
pub enum DiagnosticTag {
    Unnecessary,
    Deprecated,
}

impl DiagnosticTag {
    pub const fn wire_value(self) -> u8 {
        match self {
            DiagnosticTag::Unnecessary => 1,
            DiagnosticTag::Deprecated => 2,
        }
    }
}

/// The closed set of stable error codes. Numeric discriminants are
/// implementation-defined but stable within a major version; names are
/// the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    CasingInstruction,
    CasingDirective,
    ArgumentMissing,
    ArgumentExtra,
    ArgumentRequiresOne,
    ArgumentRequiresAtLeastOne,
    ArgumentRequiresTwo,
    ArgumentRequiresAtLeastTwo,
    ArgumentRequiresOneOrThree,
    ArgumentUnnecessary,
    DuplicateBuildStageName,
    EmptyContinuationLine,
    InvalidBuildStageName,
    FlagAtLeastOne,
    FlagDuplicate,
    FlagInvalidDuration,
    FlagLessThan1ms,
    FlagMissingDuration,
    FlagMissingValue,
    FlagUnknownUnit,
    FlagExpectedBooleanValue,
    FlagInvalidFromValue,
    NoSourceImage,
    InvalidEscapeDirective,
    DuplicatedEscapeDirective,
    InvalidAs,
    InvalidDestination,
    InvalidPort,
    InvalidProto,
    InvalidReferenceFormat,
    InvalidSignal,
    InvalidSyntax,
    OnbuildChainingDisallowed,
    OnbuildTriggerDisallowed,
    ShellJsonForm,
    ShellRequiresOne,
    SyntaxMissingEquals,
    SyntaxMissingNames,
    SyntaxMissingSingleQuote,
    SyntaxMissingDoubleQuote,
    MultipleInstructions,
    UnknownInstruction,
    UnknownAddFlag,
    UnknownCopyFlag,
    UnknownFromFlag,
    UnknownHealthcheckFlag,
    UnknownType,
    UnsupportedModifier,
    DeprecatedMaintainer,
    HealthcheckCmdArgumentMissing,
    JsonInSingleQuotes,
    WorkdirIsNotAbsolute,
    BaseNameEmpty,
}

impl ErrorCode {
    /// Intrinsic severity for codes that are not gated by `ValidatorSettings`.
    /// Rules tied to a setting look the severity up there instead.
    pub const fn intrinsic_severity(self) -> Severity {
        Severity::Error
    }
}

pub const SOURCE: &str = "dockerfile-utils";

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
    pub source: &'static str,
    /// First line of the owning instruction, so ignore-comments on the
    /// preceding line can suppress this diagnostic. `None` for
    /// directive/document-level diagnostics.
    pub instruction_line: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<DiagnosticTag>,
}

impl Diagnostic {
    pub fn new(range: Range, severity: Severity, code: ErrorCode, message: String) -> Self {
        Self {
            range,
            severity,
            code,
            message,
            source: SOURCE,
            instruction_line: None,
            tags: Vec::new(),
        }
    }

    pub fn with_instruction_line(mut self, line: Option<u32>) -> Self {
        self.instruction_line = line;
        self
    }

    pub fn with_tag(mut self, tag: DiagnosticTag) -> Self {
        self.tags.push(tag);
        self
    }
}

/// Substitutes `${0}`, `${1}`, … in a message template positionally.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'{') {
            if let Some(close) = template[i + 2..].find('}') {
                let idx_str = &template[i + 2..i + 2 + close];
                if let Ok(idx) = idx_str.parse::<usize>() {
                    if let Some(arg) = args.get(idx) {
                        out.push_str(arg);
                        i += 2 + close + 1;
                        continue;
                    }
                }
            }
        }
        out.push(template[i..].chars().next().unwrap());
        i += template[i..].chars().next().unwrap().len_utf8();
    }
    out
}
