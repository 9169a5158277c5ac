// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Strip comments, blank out string literals, leave quoted-identifier
//! syntax (`[x]`, `"x"`, `` `x` ``) untouched for the tokenizer to
//! interpret.

/// Replace single-line (`--`) and block (`/* */`) comments, and the
/// contents of single-quoted string literals, with a single space each,
/// preserving line counts (for the complexity scorer) and token
/// boundaries while guaranteeing no identifier is ever read out of a
/// comment or a string literal.
pub fn strip_comments_and_strings(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        match c {
            '-' if matches!(chars.peek(), Some((_, '-'))) => {
                chars.next();
                out.push(' ');
                out.push(' ');
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                    out.push(' ');
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                out.push(' ');
                out.push(' ');
                let mut prev = ' ';
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                    } else {
                        out.push(' ');
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            '\'' => {
                out.push(' ');
                loop {
                    match chars.next() {
                        None => break,
                        Some((_, '\'')) => {
                            if matches!(chars.peek(), Some((_, '\''))) {
                                chars.next();
                                out.push(' ');
                                out.push(' ');
                                continue;
                            }
                            out.push(' ');
                            break;
                        }
                        Some((_, ch)) => {
                            out.push(if ch == '\n' { '\n' } else { ' ' });
                        }
                    }
                }
            }
            other => out.push(other),
        }
    }

    out
}

/// Count non-blank lines in the raw (un-normalized) body: the "Size"
/// dimension of the complexity table operates on the body as written,
/// comments included.
pub fn non_blank_line_count(body: &str) -> usize {
    body.lines().filter(|l| !l.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_line_comment() {
        let out = strip_comments_and_strings("SELECT 1 -- FROM Secret\nFROM dbo.T");
        assert!(!out.contains("Secret"));
        assert!(out.contains("FROM dbo.T"));
    }

    #[test]
    fn strips_block_comment() {
        let out = strip_comments_and_strings("SELECT /* FROM Secret */ 1 FROM dbo.T");
        assert!(!out.contains("Secret"));
    }

    #[test]
    fn strips_string_literal_content() {
        let out = strip_comments_and_strings("SELECT 'FROM Secret' FROM dbo.T");
        assert!(!out.contains("Secret"));
        assert!(out.contains("FROM dbo.T"));
    }

    #[test]
    fn handles_escaped_quote_in_literal() {
        let out = strip_comments_and_strings("SELECT 'it''s a test' FROM dbo.T");
        assert!(out.contains("FROM dbo.T"));
    }

    #[test]
    fn preserves_bracketed_identifiers() {
        let out = strip_comments_and_strings("SELECT * FROM [dbo].[Students]");
        assert!(out.contains("[dbo]"));
        assert!(out.contains("[Students]"));
    }

    #[test]
    fn non_blank_line_count_ignores_blank_lines() {
        assert_eq!(non_blank_line_count("a\n\nb\n   \nc"), 3);
    }
}
