//! `EXPOSE port[/proto]...`.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::argtext::strip_quotes;
use crate::ast::{Argument, Instruction};
use crate::diagnostics::{format_message, Diagnostic, ErrorCode};
use crate::position::{Position, Range};

use super::{emit_intrinsic, require_at_least_one_argument};

static PORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9])+(?:-[0-9]+)?(?::(?:[0-9])+(?:-[0-9]*)?)?(?:/(\w*))?(?:/\w*)*$").unwrap()
});

pub fn check(instr: &Instruction, out: &mut Vec<Diagnostic>) {
    require_at_least_one_argument(instr, out);

    for (raw, expanded) in instr.raw_arguments.iter().zip(instr.expanded_arguments.iter()) {
        let value = strip_quotes(&expanded.value);
        if value.starts_with('$') {
            continue;
        }
        match PORT_RE.captures(value) {
            Some(caps) => {
                if let Some(proto) = caps.get(1) {
                    let proto_str = proto.as_str();
                    if !proto_str.is_empty()
                        && !proto_str.eq_ignore_ascii_case("tcp")
                        && !proto_str.eq_ignore_ascii_case("udp")
                        && !proto_str.eq_ignore_ascii_case("sctp")
                    {
                        emit_intrinsic(
                            out,
                            proto_range(raw, value, proto.start(), proto.end()),
                            ErrorCode::InvalidProto,
                            format_message("Invalid protocol \"${0}\"", &[proto_str]),
                            instr.line,
                        );
                    }
                }
            }
            None => {
                emit_intrinsic(
                    out,
                    raw.range,
                    ErrorCode::InvalidPort,
                    format_message("Invalid port \"${0}\"", &[value]),
                    instr.line,
                );
            }
        }
    }
}

/// Maps a byte offset range within the (quote-stripped) matched `value`
/// back onto the argument's source range, so `INVALID_PROTO` can point at
/// just the protocol substring instead of the whole token. `raw.range`
/// spans the token as written, quotes included, while `value` never does,
/// so a quoted token's content starts one UTF-16 unit in.
fn proto_range(raw: &Argument, value: &str, start: usize, end: usize) -> Range {
    if raw.range.start.line != raw.range.end.line {
        return raw.range;
    }
    let span_len = raw.range.end.character - raw.range.start.character;
    let value_len = value.encode_utf16().count() as u32;
    let quote_offset = span_len.saturating_sub(value_len).min(1);
    let start_u16 = value[..start].encode_utf16().count() as u32;
    let end_u16 = value[..end].encode_utf16().count() as u32;
    let base = raw.range.start.character + quote_offset;
    Range::new(
        Position::new(raw.range.start.line, base + start_u16),
        Position::new(raw.range.start.line, base + end_u16),
    )
}
