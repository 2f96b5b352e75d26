//! Line-oriented indentation formatter: normalizes continuation-line
//! indentation and trims trailing whitespace on blank lines, touching
//! nothing else. Shares the AST Adapter with the validator but never
//! produces diagnostics.

use std::collections::HashSet;

use crate::ast::parser;
use crate::ast::Dockerfile;
use crate::config::FormatterSettings;
use crate::position::{Position, Range, TextEdit, TextIndex};

struct Classification {
    indented: Vec<bool>,
    skipped: Vec<bool>,
    heredoc_lines: HashSet<u32>,
}

fn classify(df: &Dockerfile, line_count: u32) -> Classification {
    let mut indented = vec![false; line_count as usize];
    let mut skipped = vec![false; line_count as usize];
    let mut heredoc_lines = HashSet::new();

    for instr in &df.instructions {
        let first = *instr.line_span.start();
        let last = *instr.line_span.end();
        for line in (first + 1)..=last {
            if let (Some(i), Some(s)) = (indented.get_mut(line as usize), skipped.get_mut(line as usize)) {
                *i = true;
                *s = true;
            }
        }
        for hd in &instr.heredocs {
            if let Some(cr) = hd.content_range {
                for line in cr.start.line..=cr.end.line {
                    heredoc_lines.insert(line);
                }
                heredoc_lines.insert(cr.end.line + 1);
            }
        }
    }

    Classification { indented, skipped, heredoc_lines }
}

fn indentation_unit(settings: &FormatterSettings) -> String {
    if settings.insert_spaces {
        " ".repeat(settings.tab_size as usize)
    } else {
        "\t".to_string()
    }
}

fn utf16_len(s: &str) -> u32 {
    s.chars().map(|c| c.len_utf16() as u32).sum()
}

fn format_line(idx: &TextIndex, line: u32, classification: &Classification, settings: &FormatterSettings) -> Option<TextEdit> {
    if settings.ignore_multiline_instructions && classification.skipped.get(line as usize).copied().unwrap_or(false) {
        return None;
    }
    if classification.heredoc_lines.contains(&line) {
        return None;
    }
    let indented = classification.indented.get(line as usize).copied().unwrap_or(false);
    compute_line_edit(idx, line, indented, settings)
}

fn compute_line_edit(idx: &TextIndex, line: u32, indented: bool, settings: &FormatterSettings) -> Option<TextEdit> {
    let content = idx.line_content(line);
    let bytes = content.as_bytes();
    let mut j = 0;
    while j < bytes.len() && (bytes[j] == b' ' || bytes[j] == b'\t') {
        j += 1;
    }

    if j == bytes.len() {
        // Blank (or all-whitespace) line: trim it entirely.
        if j == 0 {
            return None;
        }
        let start = Position::new(line, 0);
        let end = Position::new(line, utf16_len(content));
        return Some(TextEdit::delete(Range::new(start, end)));
    }

    let indent_text = &content[..j];
    if indented {
        let unit = indentation_unit(settings);
        if indent_text != unit {
            let start = Position::new(line, 0);
            let end = Position::new(line, utf16_len(indent_text));
            return Some(TextEdit::new(Range::new(start, end), unit));
        }
    } else if j > 0 {
        let start = Position::new(line, 0);
        let end = Position::new(line, utf16_len(indent_text));
        return Some(TextEdit::delete(Range::new(start, end)));
    }
    None
}

pub fn format(source: &str, settings: &FormatterSettings) -> Vec<TextEdit> {
    let df = parser::parse(source);
    let idx = TextIndex::new(source);
    let line_count = idx.line_count() as u32;
    let classification = classify(&df, line_count);

    (0..line_count)
        .filter_map(|line| format_line(&idx, line, &classification, settings))
        .collect()
}

pub fn format_range(source: &str, range: Range, settings: &FormatterSettings) -> Vec<TextEdit> {
    let df = parser::parse(source);
    let idx = TextIndex::new(source);
    let line_count = idx.line_count() as u32;
    let classification = classify(&df, line_count);
    let last = range.end.line.min(line_count.saturating_sub(1));

    (range.start.line..=last)
        .filter_map(|line| format_line(&idx, line, &classification, settings))
        .collect()
}

/// `typed_char` was just inserted at `position`. If it is the active
/// escape character, the cursor is outside any comment/directive, and
/// only whitespace/line-terminator follows it to end-of-line, the
/// *next* line is scheduled for formatting with `indented = true`
/// (format-on-type never reformats the line that was just typed on).
pub fn format_on_type(
    source: &str,
    position: Position,
    typed_char: char,
    escape: char,
    settings: &FormatterSettings,
) -> Vec<TextEdit> {
    if typed_char != escape {
        return Vec::new();
    }

    let idx = TextIndex::new(source);
    let line_content = idx.line_content(position.line);
    let rest_of_line = {
        let col = position.character.min(utf16_len(line_content)) as usize;
        // `character` is a UTF-16 column; re-derive the byte offset within
        // this line by walking UTF-16 units (ASCII-dominant Dockerfiles
        // make this cheap and exact for the escape character itself).
        let mut units = 0usize;
        let mut byte_idx = line_content.len();
        for (i, ch) in line_content.char_indices() {
            if units >= col {
                byte_idx = i;
                break;
            }
            units += ch.len_utf16();
        }
        &line_content[byte_idx..]
    };
    if !rest_of_line.trim().is_empty() {
        return Vec::new();
    }

    let df = parser::parse(source);
    let in_comment_or_directive = df.comments.iter().any(|c| c.range.start.line == position.line)
        || df.directives.iter().any(|d| d.name_range.start.line == position.line);
    if in_comment_or_directive {
        return Vec::new();
    }

    let next_line = position.line + 1;
    let line_count = idx.line_count() as u32;
    if next_line >= line_count {
        return Vec::new();
    }

    let classification = classify(&df, line_count);
    if classification.heredoc_lines.contains(&next_line) {
        return Vec::new();
    }

    compute_line_edit(&idx, next_line, true, settings).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(insert_spaces: bool, tab_size: u32) -> FormatterSettings {
        FormatterSettings { insert_spaces, tab_size, ignore_multiline_instructions: false }
    }

    #[test]
    fn test_leading_whitespace_on_first_line_is_deleted() {
        let edits = format("   FROM node", &settings(false, 4));
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].range, Range::new(Position::new(0, 0), Position::new(0, 3)));
        assert_eq!(edits[0].new_text, "");
    }

    #[test]
    fn test_continuation_line_gets_tab_by_default() {
        let edits = format("EXPOSE 8081\\\n8082", &FormatterSettings::default());
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].range, Range::new(Position::new(1, 0), Position::new(1, 0)));
        assert_eq!(edits[0].new_text, "\t");
    }

    #[test]
    fn test_heredoc_produces_zero_edits() {
        let edits = format("RUN <<EOT\nabc\nEOT", &FormatterSettings::default());
        assert!(edits.is_empty());
    }

    #[test]
    fn test_blank_continuation_line_trimmed() {
        let edits = format("RUN echo a \\\n   \\\necho b", &FormatterSettings::default());
        assert!(edits.iter().any(|e| e.range.start.line == 1 && e.new_text.is_empty()));
    }

    #[test]
    fn test_already_correct_indentation_produces_no_edit() {
        let source = "RUN echo a \\\n\techo b";
        let edits = format(source, &settings(false, 4));
        assert!(edits.is_empty());
    }

    #[test]
    fn test_ignore_multiline_instructions_skips_continuation_lines() {
        let settings = FormatterSettings { insert_spaces: false, tab_size: 4, ignore_multiline_instructions: true };
        let edits = format("RUN echo a \\\n  echo b", &settings);
        assert!(!edits.iter().any(|e| e.range.start.line == 1));
    }

    #[test]
    fn test_format_range_limits_to_requested_lines() {
        let source = "   FROM node\nRUN echo a \\\n  echo b";
        let edits = format_range(source, Range::new(Position::new(0, 0), Position::new(0, 0)), &settings(false, 4));
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].range.start.line, 0);
    }

    #[test]
    fn test_format_on_type_schedules_next_line() {
        let source = "RUN echo a \\\n  echo b";
        let edits = format_on_type(source, Position::new(0, 12), '\\', '\\', &settings(false, 4));
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].range.start.line, 1);
        assert_eq!(edits[0].new_text, "\t");
    }

    #[test]
    fn test_format_on_type_ignores_non_escape_char() {
        let source = "RUN echo a \\\n  echo b";
        let edits = format_on_type(source, Position::new(0, 12), 'x', '\\', &settings(false, 4));
        assert!(edits.is_empty());
    }

    #[test]
    fn test_format_on_type_skips_heredoc_next_line() {
        let source = "RUN <<EOT\nabc\nEOT";
        let edits = format_on_type(source, Position::new(0, 9), '\\', '\\', &settings(false, 4));
        assert!(edits.is_empty());
    }
}
