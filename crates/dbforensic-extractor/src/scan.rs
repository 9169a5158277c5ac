// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Turn the normalized body into a flat token stream. Quoted-identifier
//! syntax (`[x]`, `"x"`, `` `x` ``) is resolved here: the inner text
//! becomes an [`Token::Ident`], quotes stripped.

use crate::token::{classify_keyword, is_ident_word, Token};

/// Lex a normalized body (comments/string-literals already blanked) into
/// tokens. Two-word keywords are folded eagerly by peeking one raw word
/// ahead; this is the only lookahead the scanner performs.
pub fn scan(normalized: &str) -> Vec<Token> {
    let words = split_words(normalized);
    let mut tokens = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        let word = &words[i];
        match word.as_str() {
            "." => tokens.push(Token::Dot),
            "," => tokens.push(Token::Comma),
            "(" => tokens.push(Token::LParen),
            ")" => tokens.push(Token::RParen),
            "=" => tokens.push(Token::Eq),
            ";" => tokens.push(Token::Semicolon),
            "*" => tokens.push(Token::Star),
            w if w.starts_with('\u{1}') => {
                // quoted identifier marker, see split_words
                tokens.push(Token::Ident(w[1..].to_string()));
            }
            w if is_ident_word(w) => {
                let next = words.get(i + 1).map(|s| s.as_str());
                if let Some((kw, consumed)) = classify_keyword(w, next) {
                    tokens.push(Token::Keyword(kw));
                    i += consumed;
                    continue;
                }
                tokens.push(Token::Ident(w.to_string()));
            }
            other => tokens.push(Token::Other(other.to_string())),
        }
        i += 1;
    }
    tokens
}

/// Split into "words": runs of identifier characters, quoted-identifier
/// spans (prefixed with `\u{1}` so the caller can recognize them without
/// re-scanning for brackets), and single-character punctuation.
fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(_, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '[' {
            chars.next();
            let mut inner = String::new();
            for (_, ch) in chars.by_ref() {
                if ch == ']' {
                    break;
                }
                inner.push(ch);
            }
            words.push(format!("\u{1}{inner}"));
            continue;
        }
        if c == '"' || c == '`' {
            let quote = c;
            chars.next();
            let mut inner = String::new();
            for (_, ch) in chars.by_ref() {
                if ch == quote {
                    break;
                }
                inner.push(ch);
            }
            words.push(format!("\u{1}{inner}"));
            continue;
        }
        if c.is_alphanumeric() || c == '_' || c == '#' || c == '@' || c == '$' {
            let mut word = String::new();
            while let Some(&(_, ch)) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' || ch == '#' || ch == '@' || ch == '$' {
                    word.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            words.push(word);
            continue;
        }
        // single-character punctuation/operator token
        chars.next();
        words.push(c.to_string());
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Keyword;

    #[test]
    fn scans_basic_select() {
        let tokens = scan("SELECT * FROM dbo.Students");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Select),
                Token::Star,
                Token::Keyword(Keyword::From),
                Token::Ident("dbo".to_string()),
                Token::Dot,
                Token::Ident("Students".to_string()),
            ]
        );
    }

    #[test]
    fn scans_bracketed_identifier() {
        let tokens = scan("FROM [dbo].[Students] s");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::From),
                Token::Ident("dbo".to_string()),
                Token::Dot,
                Token::Ident("Students".to_string()),
                Token::Ident("s".to_string()),
            ]
        );
    }

    #[test]
    fn folds_two_word_keyword() {
        let tokens = scan("INSERT INTO dbo.Log");
        assert_eq!(tokens[0], Token::Keyword(Keyword::InsertInto));
    }

    #[test]
    fn scans_join_predicate() {
        let tokens = scan("INNER JOIN dbo.Enrollments e ON e.student_id = s.id");
        assert!(tokens.contains(&Token::Keyword(Keyword::InnerJoin)));
        assert!(tokens.contains(&Token::Eq));
    }
}
