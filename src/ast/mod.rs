//! AST Adapter: the minimal interface the validator/formatter require of
//! a parsed Dockerfile. `parser` builds a concrete instance of this
//! contract from source text; the validator and formatter only ever see
//! these types, never raw bytes, so a different front end could supply
//! the same shapes.

pub mod argtext;
pub mod parser;

use crate::position::Range;

#[derive(Debug, Clone)]
pub struct Directive {
    pub name: String,
    pub name_range: Range,
    pub value: String,
    pub value_range: Range,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub range: Range,
    pub content: String,
}

/// A raw argument token: exactly the source text of the token (quotes,
/// if any, included), with its source range.
#[derive(Debug, Clone)]
pub struct Argument {
    pub value: String,
    pub range: Range,
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub name: String,
    pub name_range: Range,
    /// `None` for a boolean-style flag with no `=value`.
    pub value: Option<String>,
    pub value_range: Option<Range>,
    /// Range of the whole `--name` or `--name=value` token.
    pub range: Range,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    /// `+`, `-`, `?`, or whatever text followed the `:` in `${name:...}`.
    pub modifier: Option<String>,
    /// Range of the modifier's payload (after the `:`), used when the
    /// modifier itself is invalid. `None` when there is no modifier.
    pub modifier_range: Option<Range>,
    /// Range of the whole `$name` / `${...}` occurrence.
    pub range: Range,
}

#[derive(Debug, Clone)]
pub struct HeredocRegion {
    pub delimiter: String,
    pub delimiter_range: Range,
    pub content_range: Option<Range>,
}

#[derive(Debug, Clone)]
pub struct JsonString {
    pub value: String,
    pub range: Range,
}

#[derive(Debug, Clone)]
pub struct JsonForm {
    pub open_bracket: Range,
    pub close_bracket: Range,
    pub strings: Vec<JsonString>,
}

#[derive(Debug, Clone)]
pub struct FromInfo {
    pub image_range: Range,
    pub tag_range: Option<Range>,
    pub digest_range: Option<Range>,
    pub stage_name_range: Option<Range>,
}

#[derive(Debug, Clone)]
pub struct Instruction {
    /// Exactly as written in the source (preserves casing).
    pub keyword: String,
    pub keyword_range: Range,
    /// Full range of the instruction, spanning continuation lines.
    pub range: Range,
    /// First line of the instruction (0-based), used as `instruction_line`.
    pub line: u32,
    /// Span of the raw argument text (after the keyword, before any
    /// trailing whitespace), empty range if there are no arguments.
    pub arguments_range: Range,
    pub raw_arguments: Vec<Argument>,
    /// `raw_arguments` with unambiguous `ARG`/`ENV` substitution applied.
    pub expanded_arguments: Vec<Argument>,
    pub flags: Vec<Flag>,
    pub variables: Vec<Variable>,
    pub heredocs: Vec<HeredocRegion>,
    pub json: Option<JsonForm>,
    pub from_info: Option<FromInfo>,
    /// Set only for `ONBUILD`: the instruction it triggers.
    pub onbuild_trigger: Option<Box<Instruction>>,
    /// Lines belonging to this instruction (for continuation-blank-line
    /// detection), 0-based, inclusive of `line`.
    pub line_span: std::ops::RangeInclusive<u32>,
}

impl Instruction {
    pub fn keyword_upper(&self) -> String {
        self.keyword.to_ascii_uppercase()
    }
}

#[derive(Debug, Clone)]
pub struct Dockerfile {
    pub directives: Vec<Directive>,
    pub comments: Vec<Comment>,
    pub instructions: Vec<Instruction>,
    pub escape_char: char,
    pub line_count: u32,
}
