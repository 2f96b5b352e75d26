//! A compact, line-oriented Dockerfile tokenizer that builds the AST
//! Adapter contract types. This plays the role the design calls the
//! "external recipe parser collaborator" — the validator and formatter
//! never see raw source, only what this module produces.
//!
//! It is deliberately regex/line-driven rather than a full shell
//! grammar: real-world Dockerfiles are simple enough that whitespace-
//! and-quote tokenization covers the overwhelming majority of inputs,
//! and degenerate cases (deeply nested quoting) degrade to a best-effort
//! token list rather than a hard failure, matching §4.8's "skip the
//! check, don't throw" posture.

use std::collections::HashMap;

use crate::position::{Position, Range, TextIndex};

use super::argtext::{
    decompose_json_array, extract_flags, find_variables, join_continuations, shell_tokens,
    strip_quotes,
};
use super::{
    Argument, Comment, Directive, Dockerfile, Flag, FromInfo, HeredocRegion, Instruction,
    JsonForm, JsonString, Variable,
};

const JSON_FORM_KEYWORDS: &[&str] = &["CMD", "ENTRYPOINT", "RUN", "SHELL", "VOLUME", "ADD", "COPY"];

pub fn parse(source: &str) -> Dockerfile {
    let idx = TextIndex::new(source);
    let line_count = idx.line_count() as u32;

    let (directives, directive_end_line) = parse_directives(&idx);
    let escape_char = resolve_escape_char(&directives);

    let mut comments = Vec::new();
    let mut instructions = Vec::new();

    let mut line = 0u32;
    while line < line_count {
        let content = idx.line_content(line);
        let trimmed = content.trim_start();
        if trimmed.is_empty() {
            line += 1;
            continue;
        }
        if trimmed.starts_with('#') {
            if line >= directive_end_line || !is_directive_shaped(trimmed) {
                let leading_ws = (content.len() - trimmed.len()) as u32;
                let start = Position::new(line, leading_ws);
                let end = Position::new(line, utf16_len(content));
                let body = trimmed.trim_start_matches('#').trim();
                comments.push(Comment {
                    range: Range::new(start, end),
                    content: body.to_string(),
                });
            }
            line += 1;
            continue;
        }

        let (instruction, next_line) = build_instruction(source, &idx, line, line_count, escape_char);
        line = next_line;
        instructions.push(instruction);
    }

    apply_expansion(&mut instructions);

    Dockerfile {
        directives,
        comments,
        instructions,
        escape_char,
        line_count,
    }
}

fn utf16_len(s: &str) -> u32 {
    s.chars().map(|c| c.len_utf16() as u32).sum()
}

fn is_directive_shaped(trimmed_line: &str) -> bool {
    let body = trimmed_line.trim_start_matches('#');
    let body = body.trim_start();
    match body.find('=') {
        Some(eq) => {
            let name = body[..eq].trim();
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == '-' || c == '_')
        }
        None => false,
    }
}

/// Parses the leading directive block and returns `(directives, first
/// line no longer eligible to be a directive)`.
fn parse_directives(idx: &TextIndex) -> (Vec<Directive>, u32) {
    let mut directives = Vec::new();
    let mut line = 0u32;
    let total = idx.line_count() as u32;
    while line < total {
        let content = idx.line_content(line);
        let trimmed = content.trim_start();
        if trimmed.is_empty() {
            return (directives, line);
        }
        if !trimmed.starts_with('#') || !is_directive_shaped(trimmed) {
            return (directives, line);
        }
        let leading_ws = (content.len() - trimmed.len()) as u32;
        let body = trimmed.trim_start_matches('#');
        let body_ws = (trimmed.len() - body.len()) as u32;
        let body_trimmed = body.trim_start();
        let eq = body_trimmed.find('=').unwrap();
        let name = body_trimmed[..eq].trim_end();
        let value_start_in_body = body_trimmed.len() - body_trimmed[eq + 1..].trim_start().len();
        let value = body_trimmed[eq + 1..].trim();

        let name_col_start = leading_ws + 1 + body_ws + (body.len() - body_trimmed.len()) as u32;
        let name_col_end = name_col_start + utf16_len(name);
        let value_col_start = leading_ws + 1 + body_ws + value_start_in_body as u32;
        let value_col_end = value_col_start + utf16_len(value);

        directives.push(Directive {
            name: name.to_string(),
            name_range: Range::new(
                Position::new(line, name_col_start),
                Position::new(line, name_col_end),
            ),
            value: value.to_string(),
            value_range: Range::new(
                Position::new(line, value_col_start),
                Position::new(line, value_col_end),
            ),
        });
        line += 1;
    }
    (directives, line)
}

fn resolve_escape_char(directives: &[Directive]) -> char {
    for d in directives {
        if d.name.eq_ignore_ascii_case("escape") {
            return match d.value.as_str() {
                "\\" => '\\',
                "`" => '`',
                _ => '\\',
            };
        }
    }
    '\\'
}

fn r(idx: &TextIndex, s: usize, e: usize) -> Range {
    Range::new(idx.position_at(s), idx.position_at(e))
}

fn map_span(map: &[usize], joined_len: usize, fallback: usize, s: usize, e: usize) -> (usize, usize) {
    let start = if s < map.len() {
        map[s]
    } else if joined_len > 0 && !map.is_empty() {
        map[map.len() - 1] + 1
    } else {
        fallback
    };
    let end = if e == 0 {
        start
    } else if e - 1 < map.len() {
        map[e - 1] + 1
    } else {
        start
    };
    (start, end)
}

struct Heredoc {
    delimiter: String,
    joined_range: (usize, usize),
}

fn scan_heredoc_openers(text: &str) -> Vec<Heredoc> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'<' && bytes[i + 1] == b'<' {
            let mut j = i + 2;
            if j < bytes.len() && bytes[j] == b'-' {
                j += 1;
            }
            let ident_start = j;
            let quote = if j < bytes.len() && (bytes[j] == b'"' || bytes[j] == b'\'') {
                let q = bytes[j];
                j += 1;
                Some(q)
            } else {
                None
            };
            let name_start = j;
            while j < bytes.len()
                && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_' || bytes[j] == b'-')
            {
                j += 1;
            }
            if j > name_start {
                let name = text[name_start..j].to_string();
                if let Some(q) = quote {
                    if j < bytes.len() && bytes[j] == q {
                        j += 1;
                    }
                }
                out.push(Heredoc {
                    delimiter: name,
                    joined_range: (ident_start, j),
                });
                i = j;
                continue;
            }
        }
        i += 1;
    }
    out
}

#[allow(clippy::too_many_lines)]
fn build_instruction(
    source: &str,
    idx: &TextIndex,
    start_line: u32,
    total_lines: u32,
    escape: char,
) -> (Instruction, u32) {
    // Find the header's last line: continuation lines end in the escape
    // character followed only by whitespace to end-of-line.
    let mut header_last = start_line;
    while header_last + 1 < total_lines {
        let content = idx.line_content(header_last);
        let trimmed = content.trim_end();
        if trimmed.ends_with(escape) {
            header_last += 1;
        } else {
            break;
        }
    }

    let header_start_byte = idx.offset_at(Position::new(start_line, 0));
    let header_end_byte = idx.offset_at(Position::new(
        header_last,
        utf16_len(idx.line_content(header_last)),
    ));

    let (joined, map) = join_continuations(source, header_start_byte, header_end_byte, escape);

    let kw_start_j = joined.len() - joined.trim_start().len();
    let after_kw = &joined[kw_start_j..];
    let kw_len = after_kw.find(char::is_whitespace).unwrap_or(after_kw.len());
    let kw_end_j = kw_start_j + kw_len;
    let keyword = joined[kw_start_j..kw_end_j].to_string();
    let (kw_start_b, kw_end_b) = map_span(&map, joined.len(), header_end_byte, kw_start_j, kw_end_j);
    let keyword_range = r(idx, kw_start_b, kw_end_b);

    let args_j_start_raw = kw_end_j;
    let args_text_untrimmed = &joined[args_j_start_raw..];
    let args_lead_ws = args_text_untrimmed.len() - args_text_untrimmed.trim_start().len();
    let args_j_start = args_j_start_raw + args_lead_ws;
    let args_trimmed = joined[args_j_start..].trim_end();
    let args_j_end = args_j_start + args_trimmed.len();
    let args_text = &joined[args_j_start..args_j_end];

    let (args_start_b, args_end_b) = map_span(&map, joined.len(), header_end_byte, args_j_start, args_j_end);
    let arguments_range = r(idx, args_start_b, args_end_b);

    // Heredoc openers found in the header's argument text.
    let heredoc_openers = scan_heredoc_openers(args_text);
    let mut heredocs = Vec::new();
    let mut cursor_line = header_last + 1;
    for opener in &heredoc_openers {
        let (delim_start_b, delim_end_b) = map_span(
            &map,
            joined.len(),
            header_end_byte,
            args_j_start + opener.joined_range.0,
            args_j_start + opener.joined_range.1,
        );
        let delimiter_range = r(idx, delim_start_b, delim_end_b);

        let content_start_line = cursor_line;
        let mut body_end_line = None;
        let mut scan = cursor_line;
        while scan < total_lines {
            if idx.line_content(scan).trim() == opener.delimiter {
                body_end_line = Some(scan);
                break;
            }
            scan += 1;
        }
        let content_range = match body_end_line {
            Some(term_line) if term_line > content_start_line => Some(Range::new(
                Position::new(content_start_line, 0),
                Position::new(term_line - 1, utf16_len(idx.line_content(term_line - 1))),
            )),
            Some(_) => None,
            None => {
                if content_start_line < total_lines {
                    Some(Range::new(
                        Position::new(content_start_line, 0),
                        Position::new(total_lines - 1, utf16_len(idx.line_content(total_lines - 1))),
                    ))
                } else {
                    None
                }
            }
        };
        heredocs.push(HeredocRegion {
            delimiter: opener.delimiter.clone(),
            delimiter_range,
            content_range,
        });
        cursor_line = match body_end_line {
            Some(term_line) => term_line + 1,
            None => total_lines,
        };
    }

    let instruction_end_line = if heredoc_openers.is_empty() {
        header_last
    } else {
        cursor_line.saturating_sub(1).max(header_last)
    };
    let instruction_end_byte = idx.offset_at(Position::new(
        instruction_end_line,
        utf16_len(idx.line_content(instruction_end_line)),
    ));
    let range = r(idx, header_start_byte, instruction_end_byte);

    // Flags, JSON form, raw arguments, variables — all computed over the
    // header's argument text (heredoc bodies are never argument text).
    let tokens = shell_tokens(args_text);
    let (flag_spans, first_positional) = extract_flags(&tokens);
    let flags: Vec<Flag> = flag_spans
        .iter()
        .map(|f| {
            let (ns, ne) = map_span(&map, joined.len(), header_end_byte, args_j_start + f.name_start, args_j_start + f.name_end);
            let (rs, re) = map_span(&map, joined.len(), header_end_byte, args_j_start + f.start, args_j_start + f.end);
            let value_range = f.value_range.map(|(vs, ve)| {
                let (s, e) = map_span(&map, joined.len(), header_end_byte, args_j_start + vs, args_j_start + ve);
                r(idx, s, e)
            });
            Flag {
                name: f.name.clone(),
                name_range: r(idx, ns, ne),
                value: f.value.clone(),
                value_range,
                range: r(idx, rs, re),
            }
        })
        .collect();

    let keyword_upper = keyword.to_ascii_uppercase();
    let json = if JSON_FORM_KEYWORDS.contains(&keyword_upper.as_str()) {
        let positional_start = tokens.get(first_positional).map_or(args_text.len(), |t| t.start);
        decompose_json_array(&args_text[positional_start..]).map(|arr| {
            let base = positional_start;
            let (os, oe) = map_span(&map, joined.len(), header_end_byte, args_j_start + base + arr.open, args_j_start + base + arr.open + 1);
            let (cs, ce) = map_span(&map, joined.len(), header_end_byte, args_j_start + base + arr.close, args_j_start + base + arr.close + 1);
            let strings = arr
                .strings
                .iter()
                .map(|s| {
                    let (ss, se) = map_span(&map, joined.len(), header_end_byte, args_j_start + base + s.start, args_j_start + base + s.end);
                    JsonString {
                        value: s.value.clone(),
                        range: r(idx, ss, se),
                    }
                })
                .collect();
            JsonForm {
                open_bracket: r(idx, os, oe),
                close_bracket: r(idx, cs, ce),
                strings,
            }
        })
    } else {
        None
    };

    let raw_arguments: Vec<Argument> = if let Some(j) = &json {
        j.strings
            .iter()
            .map(|s| Argument {
                value: s.value.clone(),
                range: s.range,
            })
            .collect()
    } else {
        tokens[first_positional..]
            .iter()
            .map(|t| {
                let (s, e) = map_span(&map, joined.len(), header_end_byte, args_j_start + t.start, args_j_start + t.end);
                Argument {
                    value: strip_quotes(&t.text).to_string(),
                    range: r(idx, s, e),
                }
            })
            .collect()
    };

    let variables: Vec<Variable> = find_variables(args_text)
        .into_iter()
        .map(|v| {
            let (s, e) = map_span(&map, joined.len(), header_end_byte, args_j_start + v.start, args_j_start + v.end);
            let modifier_range = v.modifier_range.map(|(ms, me)| {
                let (s2, e2) = map_span(&map, joined.len(), header_end_byte, args_j_start + ms, args_j_start + me);
                r(idx, s2, e2)
            });
            Variable {
                name: v.name,
                modifier: v.modifier,
                modifier_range,
                range: r(idx, s, e),
            }
        })
        .collect();

    let from_info = if keyword_upper == "FROM" {
        build_from_info(&raw_arguments)
    } else {
        None
    };

    let onbuild_trigger = if keyword_upper == "ONBUILD" {
        build_onbuild_trigger(
            idx,
            &joined,
            &map,
            header_end_byte,
            args_j_start,
            args_j_end,
            range,
            instruction_end_line,
        )
    } else {
        None
    };

    let instruction = Instruction {
        keyword,
        keyword_range,
        range,
        line: start_line,
        arguments_range,
        raw_arguments: raw_arguments.clone(),
        expanded_arguments: raw_arguments,
        flags,
        variables,
        heredocs,
        json,
        from_info,
        onbuild_trigger,
        line_span: start_line..=instruction_end_line,
    };

    (instruction, instruction_end_line + 1)
}

#[allow(clippy::too_many_arguments)]
fn build_onbuild_trigger(
    idx: &TextIndex,
    joined: &str,
    map: &[usize],
    header_end_byte: usize,
    outer_args_j_start: usize,
    outer_args_j_end: usize,
    outer_range: Range,
    instruction_end_line: u32,
) -> Option<Box<Instruction>> {
    let trigger_text = &joined[outer_args_j_start..outer_args_j_end];
    if trigger_text.trim().is_empty() {
        return None;
    }
    let lead_ws = trigger_text.len() - trigger_text.trim_start().len();
    let kw_start_j = outer_args_j_start + lead_ws;
    let rest = &joined[kw_start_j..outer_args_j_end];
    let kw_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let kw_end_j = kw_start_j + kw_len;
    let keyword = joined[kw_start_j..kw_end_j].to_string();
    let (kws, kwe) = map_span(map, joined.len(), header_end_byte, kw_start_j, kw_end_j);
    let keyword_range = r(idx, kws, kwe);

    let inner_args_start_raw = kw_end_j;
    let inner_text_untrimmed = &joined[inner_args_start_raw..outer_args_j_end];
    let inner_ws = inner_text_untrimmed.len() - inner_text_untrimmed.trim_start().len();
    let inner_args_j_start = inner_args_start_raw + inner_ws;
    let inner_args_j_end = outer_args_j_end;
    let inner_text = &joined[inner_args_j_start..inner_args_j_end];

    let (args_start_b, args_end_b) =
        map_span(map, joined.len(), header_end_byte, inner_args_j_start, inner_args_j_end);
    let arguments_range = r(idx, args_start_b, args_end_b);

    let tokens = shell_tokens(inner_text);
    let (flag_spans, first_positional) = extract_flags(&tokens);
    let flags: Vec<Flag> = flag_spans
        .iter()
        .map(|f| {
            let (ns, ne) = map_span(map, joined.len(), header_end_byte, inner_args_j_start + f.name_start, inner_args_j_start + f.name_end);
            let (rs, re) = map_span(map, joined.len(), header_end_byte, inner_args_j_start + f.start, inner_args_j_start + f.end);
            let value_range = f.value_range.map(|(vs, ve)| {
                let (s, e) = map_span(map, joined.len(), header_end_byte, inner_args_j_start + vs, inner_args_j_start + ve);
                r(idx, s, e)
            });
            Flag {
                name: f.name.clone(),
                name_range: r(idx, ns, ne),
                value: f.value.clone(),
                value_range,
                range: r(idx, rs, re),
            }
        })
        .collect();

    let keyword_upper = keyword.to_ascii_uppercase();
    let json = if JSON_FORM_KEYWORDS.contains(&keyword_upper.as_str()) {
        let positional_start = tokens.get(first_positional).map_or(inner_text.len(), |t| t.start);
        decompose_json_array(&inner_text[positional_start..]).map(|arr| {
            let base = positional_start;
            let (os, oe) = map_span(map, joined.len(), header_end_byte, inner_args_j_start + base + arr.open, inner_args_j_start + base + arr.open + 1);
            let (cs, ce) = map_span(map, joined.len(), header_end_byte, inner_args_j_start + base + arr.close, inner_args_j_start + base + arr.close + 1);
            let strings = arr
                .strings
                .iter()
                .map(|s| {
                    let (ss, se) = map_span(map, joined.len(), header_end_byte, inner_args_j_start + base + s.start, inner_args_j_start + base + s.end);
                    JsonString {
                        value: s.value.clone(),
                        range: r(idx, ss, se),
                    }
                })
                .collect();
            JsonForm {
                open_bracket: r(idx, os, oe),
                close_bracket: r(idx, cs, ce),
                strings,
            }
        })
    } else {
        None
    };

    let raw_arguments: Vec<Argument> = if let Some(j) = &json {
        j.strings
            .iter()
            .map(|s| Argument {
                value: s.value.clone(),
                range: s.range,
            })
            .collect()
    } else {
        tokens[first_positional..]
            .iter()
            .map(|t| {
                let (s, e) = map_span(map, joined.len(), header_end_byte, inner_args_j_start + t.start, inner_args_j_start + t.end);
                Argument {
                    value: strip_quotes(&t.text).to_string(),
                    range: r(idx, s, e),
                }
            })
            .collect()
    };

    let variables: Vec<Variable> = find_variables(inner_text)
        .into_iter()
        .map(|v| {
            let (s, e) = map_span(map, joined.len(), header_end_byte, inner_args_j_start + v.start, inner_args_j_start + v.end);
            let modifier_range = v.modifier_range.map(|(ms, me)| {
                let (s2, e2) = map_span(map, joined.len(), header_end_byte, inner_args_j_start + ms, inner_args_j_start + me);
                r(idx, s2, e2)
            });
            Variable {
                name: v.name,
                modifier: v.modifier,
                modifier_range,
                range: r(idx, s, e),
            }
        })
        .collect();

    let from_info = if keyword_upper == "FROM" {
        build_from_info(&raw_arguments)
    } else {
        None
    };

    Some(Box::new(Instruction {
        keyword,
        keyword_range,
        range: outer_range,
        line: outer_range.start.line,
        arguments_range,
        raw_arguments: raw_arguments.clone(),
        expanded_arguments: raw_arguments,
        flags,
        variables,
        heredocs: Vec::new(),
        json,
        from_info,
        onbuild_trigger: None,
        line_span: outer_range.start.line..=instruction_end_line,
    }))
}

fn build_from_info(raw_arguments: &[Argument]) -> Option<FromInfo> {
    let image = raw_arguments.first()?;
    let text = &image.value;
    let image_range = image.range;

    let at = text.find('@');
    let last_slash = text.rfind('/');
    let colon = match last_slash {
        Some(slash) => text[slash..].find(':').map(|p| p + slash),
        None => text.find(':'),
    };

    // `@` (digest) takes priority when present; tag and digest are
    // mutually exclusive in a single FROM reference.
    let (tag_span, digest_span) = if let Some(at) = at {
        (None, Some((at + 1, text.len())))
    } else if let Some(colon) = colon {
        if at.is_none() {
            (Some((colon + 1, text.len())), None)
        } else {
            (None, None)
        }
    } else {
        (None, None)
    };

    let to_range = |span: (usize, usize)| -> Range {
        // Sub-ranges within a single-line argument: character offsets are
        // relative to the argument's own range, computed via UTF-16 length
        // of the preceding slice (the argument never spans multiple lines).
        let before = &text[..span.0];
        let value = &text[span.0..span.1];
        let start_char = image_range.start.character + utf16_len_u32(before);
        let end_char = start_char + utf16_len_u32(value);
        Range::new(
            Position::new(image_range.start.line, start_char),
            Position::new(image_range.start.line, end_char),
        )
    };

    Some(FromInfo {
        image_range,
        tag_range: tag_span.map(to_range),
        digest_range: digest_span.map(to_range),
        stage_name_range: raw_arguments.get(2).map(|a| a.range),
    })
}

fn utf16_len_u32(s: &str) -> u32 {
    s.chars().map(|c| c.len_utf16() as u32).sum()
}

/// Applies unambiguous `ARG`/`ENV` substitution to each instruction's raw
/// arguments, in source order: a later instruction sees variables set by
/// earlier `ARG NAME=default` / `ENV NAME=value` declarations.
fn apply_expansion(instructions: &mut [Instruction]) {
    let mut known: HashMap<String, String> = HashMap::new();
    for instr in instructions.iter_mut() {
        let upper = instr.keyword_upper();
        instr.expanded_arguments = instr
            .raw_arguments
            .iter()
            .map(|a| Argument {
                value: expand_text(&a.value, &known),
                range: a.range,
            })
            .collect();

        if upper == "ARG" || upper == "ENV" {
            for arg in &instr.raw_arguments {
                if let Some(eq) = arg.value.find('=') {
                    let name = arg.value[..eq].to_string();
                    let value = strip_quotes(&arg.value[eq + 1..]).to_string();
                    known.insert(name, value);
                } else if upper == "ENV" {
                    // legacy `ENV NAME value` form: two raw arguments.
                }
            }
            if upper == "ENV" && instr.raw_arguments.len() >= 2 && !instr.raw_arguments[0].value.contains('=') {
                known.insert(
                    instr.raw_arguments[0].value.clone(),
                    strip_quotes(&instr.raw_arguments[1].value).to_string(),
                );
            }
        }
    }
}

fn expand_text(text: &str, known: &HashMap<String, String>) -> String {
    let vars = find_variables(text);
    if vars.is_empty() {
        return text.to_string();
    }
    let mut out = String::new();
    let mut last = 0usize;
    for v in vars {
        if v.modifier.is_none() {
            if let Some(value) = known.get(&v.name) {
                out.push_str(&text[last..v.start]);
                out.push_str(value);
                last = v.end;
            }
        }
    }
    out.push_str(&text[last..]);
    out
}
