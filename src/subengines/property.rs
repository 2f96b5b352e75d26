//! `key=value` property shape checker shared by `ARG`, `ENV`, `LABEL`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyError {
    MissingNames,
    MissingSingleQuote,
    MissingDoubleQuote,
    MissingValue,
}

/// Checks one `key=value` token. `value_required` is false only for
/// `ARG`, which permits a bare `ARG NAME` with no default.
pub fn check(token: &str, escape: char, value_required: bool) -> Result<(), PropertyError> {
    if token.is_empty() {
        return Err(PropertyError::MissingNames);
    }

    let first = token.chars().next().unwrap();
    let mut i;
    if first == '\'' || first == '"' {
        let quote = first;
        i = first.len_utf8();
        let mut found_eq_before_close = false;
        let mut closed = false;
        while i < token.len() {
            let c = token[i..].chars().next().unwrap();
            if c == quote {
                closed = true;
                i += c.len_utf8();
                break;
            }
            if c == '=' {
                found_eq_before_close = true;
            }
            i += c.len_utf8();
        }
        if !closed || found_eq_before_close {
            return Err(if quote == '\'' {
                PropertyError::MissingSingleQuote
            } else {
                PropertyError::MissingDoubleQuote
            });
        }
    } else {
        i = 0;
        while i < token.len() {
            let c = token[i..].chars().next().unwrap();
            if c == '=' {
                break;
            }
            i += c.len_utf8();
        }
    }

    let name = token[..i].trim_matches(|c| c == '\'' || c == '"');
    if name.is_empty() {
        return Err(PropertyError::MissingNames);
    }

    if i >= token.len() || token.as_bytes()[i] != b'=' {
        return if value_required {
            Err(PropertyError::MissingValue)
        } else {
            Ok(())
        };
    }

    let value = &token[i + 1..];
    if let Some(first) = value.chars().next() {
        if first == '"' {
            let chars: Vec<char> = value.chars().collect();
            let mut j = 1;
            let mut closed = false;
            while j < chars.len() {
                if chars[j] == escape && j + 1 < chars.len() {
                    j += 2;
                    continue;
                }
                if chars[j] == '"' {
                    closed = j == chars.len() - 1;
                    break;
                }
                j += 1;
            }
            if !closed {
                return Err(PropertyError::MissingDoubleQuote);
            }
        } else if first == '\'' && (value.len() < 2 || !value.ends_with('\'')) {
            return Err(PropertyError::MissingSingleQuote);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_key_value() {
        assert_eq!(check("FOO=bar", '\\', true), Ok(()));
    }

    #[test]
    fn test_bare_arg_name_allowed_when_optional() {
        assert_eq!(check("FOO", '\\', false), Ok(()));
    }

    #[test]
    fn test_missing_value_required() {
        assert_eq!(check("FOO", '\\', true), Err(PropertyError::MissingValue));
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(check("=bar", '\\', true), Err(PropertyError::MissingNames));
    }

    #[test]
    fn test_unterminated_double_quoted_value() {
        assert_eq!(
            check(r#"FOO="bar"#, '\\', true),
            Err(PropertyError::MissingDoubleQuote)
        );
    }

    #[test]
    fn test_unterminated_single_quoted_value() {
        assert_eq!(
            check("FOO='bar", '\\', true),
            Err(PropertyError::MissingSingleQuote)
        );
    }

    #[test]
    fn test_escaped_quote_inside_double_quoted_value() {
        assert_eq!(check(r#"FOO="a\"b""#, '\\', true), Ok(()));
    }

    #[test]
    fn test_quoted_name_with_embedded_equals() {
        assert_eq!(
            check(r#""FO=O"=bar"#, '\\', true),
            Err(PropertyError::MissingDoubleQuote)
        );
    }
}
