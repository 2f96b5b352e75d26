//! Low-level text analysis shared by the parser and several rule
//! sub-engines: continuation-line joining, shell-word tokenization, JSON
//! array decomposition, flag extraction, and variable-occurrence
//! scanning. Everything here works in byte offsets; `parser` maps those
//! back to `Position`s via `TextIndex`.

/// Joins escape-terminated continuation lines within `source[start..end]`
/// into one logical string, removing the escape character and the line
/// terminator it precedes. Returns the joined text plus a parallel
/// mapping from each joined byte to the original byte offset it came
/// from (for zero-length joins at a removed escape/terminator, the
/// mapping points at the removed text so ranges degrade gracefully
/// rather than panicking).
pub fn join_continuations(source: &str, start: usize, end: usize, escape: char) -> (String, Vec<usize>) {
    let bytes = source.as_bytes();
    let mut joined = String::new();
    let mut map = Vec::new();
    let mut i = start;
    while i < end {
        let ch = source[i..].chars().next().unwrap();
        let ch_len = ch.len_utf8();
        if ch == escape {
            // Escape is a continuation only if only whitespace follows to EOL.
            let mut j = i + ch_len;
            while j < end && matches!(bytes[j], b' ' | b'\t') {
                j += 1;
            }
            if j < end && (bytes[j] == b'\n' || bytes[j] == b'\r') {
                let mut k = j;
                if bytes[k] == b'\r' && bytes.get(k + 1) == Some(&b'\n') {
                    k += 2;
                } else {
                    k += 1;
                }
                i = k;
                continue;
            }
        }
        joined.push(ch);
        for p in 0..ch_len {
            map.push(i + p);
        }
        i += ch_len;
    }
    (joined, map)
}

#[derive(Debug, Clone)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Splits `text` into shell-word tokens: whitespace separates tokens
/// except inside single/double quotes. Token text is returned verbatim
/// (quotes included) since callers want the raw source form.
pub fn shell_tokens(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    while i < len {
        while i < len && (bytes[i] as char).is_whitespace() {
            i += 1;
        }
        if i >= len {
            break;
        }
        let start = i;
        let mut quote: Option<u8> = None;
        while i < len {
            let b = bytes[i];
            match quote {
                Some(q) => {
                    if b == q {
                        quote = None;
                    }
                    i += 1;
                }
                None => {
                    if b == b'\'' || b == b'"' {
                        quote = Some(b);
                        i += 1;
                    } else if (b as char).is_whitespace() {
                        break;
                    } else {
                        i += 1;
                    }
                }
            }
        }
        tokens.push(Token {
            text: text[start..i].to_string(),
            start,
            end: i,
        });
    }
    tokens
}

/// Strips one layer of matching surrounding single or double quotes.
pub fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' || first == b'\'') && first == last {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[derive(Debug, Clone)]
pub struct JsonStringSpan {
    pub value: String,
    /// Range of the whole quoted token, including the quotes.
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct JsonArray {
    pub open: usize,
    pub close: usize,
    pub strings: Vec<JsonStringSpan>,
}

/// Parses `text` as a JSON-form argument list: `[ "a", "b" ]`. Returns
/// `None` on any structural deviation (not an error — JSON form is
/// optional for most instructions).
pub fn decompose_json_array(text: &str) -> Option<JsonArray> {
    let trimmed_start = text.len() - text.trim_start().len();
    let bytes = text.as_bytes();
    let mut i = trimmed_start;
    if i >= bytes.len() || bytes[i] != b'[' {
        return None;
    }
    let open = i;
    i += 1;
    let mut strings = Vec::new();
    loop {
        while i < bytes.len() && (bytes[i] as char).is_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        if bytes[i] == b']' {
            let close = i;
            // nothing but whitespace may follow
            if text[close + 1..].trim().is_empty() {
                return Some(JsonArray { open, close, strings });
            }
            return None;
        }
        if bytes[i] != b'"' {
            return None;
        }
        let str_start = i;
        i += 1;
        let mut value = String::new();
        let mut closed = false;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b'\\' && i + 1 < bytes.len() {
                let escaped = bytes[i + 1];
                value.push(escaped as char);
                i += 2;
                continue;
            }
            if b == b'"' {
                closed = true;
                i += 1;
                break;
            }
            value.push(b as char);
            i += 1;
        }
        if !closed {
            return None;
        }
        strings.push(JsonStringSpan {
            value,
            start: str_start,
            end: i,
        });
        while i < bytes.len() && (bytes[i] as char).is_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b',' {
            i += 1;
            continue;
        }
        if i < bytes.len() && bytes[i] == b']' {
            let close = i;
            if text[close + 1..].trim().is_empty() {
                return Some(JsonArray { open, close, strings });
            }
            return None;
        }
        return None;
    }
}

#[derive(Debug, Clone)]
pub struct FlagSpan {
    pub name: String,
    pub name_start: usize,
    pub name_end: usize,
    pub value: Option<String>,
    pub value_range: Option<(usize, usize)>,
    pub start: usize,
    pub end: usize,
}

/// Consumes leading `--name`/`--name=value` tokens from `tokens`.
/// Returns the flags found and the index of the first non-flag token.
pub fn extract_flags(tokens: &[Token]) -> (Vec<FlagSpan>, usize) {
    let mut flags = Vec::new();
    let mut idx = 0;
    while idx < tokens.len() {
        let tok = &tokens[idx];
        if !tok.text.starts_with("--") || tok.text.len() < 3 {
            break;
        }
        let body = &tok.text[2..];
        let (name, value, value_range) = match body.find('=') {
            Some(eq) => {
                let name = body[..eq].to_string();
                let value_start = tok.start + 2 + eq + 1;
                let value_text = body[eq + 1..].to_string();
                let value_end = value_start + value_text.len();
                (name, Some(value_text), Some((value_start, value_end)))
            }
            None => (body.to_string(), None, None),
        };
        flags.push(FlagSpan {
            name,
            name_start: tok.start + 2,
            name_end: tok.start + 2 + body.find('=').unwrap_or(body.len()),
            value,
            value_range,
            start: tok.start,
            end: tok.end,
        });
        idx += 1;
    }
    (flags, idx)
}

#[derive(Debug, Clone)]
pub struct VariableMatch {
    pub name: String,
    pub modifier: Option<String>,
    pub modifier_range: Option<(usize, usize)>,
    pub start: usize,
    pub end: usize,
}

/// Scans `text` for `$NAME` and `${NAME...}` occurrences.
pub fn find_variables(text: &str) -> Vec<VariableMatch> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            let start = i;
            if bytes.get(i + 1) == Some(&b'{') {
                if let Some(close_rel) = text[i + 2..].find('}') {
                    let inner_start = i + 2;
                    let inner_end = inner_start + close_rel;
                    let inner = &text[inner_start..inner_end];
                    let end = inner_end + 1;
                    let (name, modifier, modifier_range) = match inner.find([':', '+', '-', '?']) {
                        Some(sep) if inner.as_bytes()[sep] == b':' => {
                            let name = inner[..sep].to_string();
                            let mod_start = inner_start + sep + 1;
                            let modifier = inner[sep + 1..].to_string();
                            let mod_end = inner_end;
                            (name, Some(modifier), Some((mod_start, mod_end)))
                        }
                        Some(sep) => {
                            // modifier without leading ':' (non-standard,
                            // but still reported against the modifier span)
                            let name = inner[..sep].to_string();
                            let mod_start = inner_start + sep;
                            let modifier = inner[sep..].to_string();
                            (name, Some(modifier), Some((mod_start, inner_end)))
                        }
                        None => (inner.to_string(), None, None),
                    };
                    out.push(VariableMatch {
                        name,
                        modifier,
                        modifier_range,
                        start,
                        end,
                    });
                    i = end;
                    continue;
                }
            } else {
                let mut j = i + 1;
                while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_') {
                    j += 1;
                }
                if j > i + 1 {
                    out.push(VariableMatch {
                        name: text[i + 1..j].to_string(),
                        modifier: None,
                        modifier_range: None,
                        start,
                        end: j,
                    });
                    i = j;
                    continue;
                }
            }
        }
        i += 1;
    }
    out
}
