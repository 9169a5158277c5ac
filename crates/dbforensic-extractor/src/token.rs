// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Token shapes produced by [`crate::scan`]. This is deliberately shallow,
//! a classifier over single words and punctuation, not a grammar;
//! `regex` here is used only to classify one token at a time
//! (`is_keyword`), never to match a clause.

use regex::Regex;
use std::sync::OnceLock;

/// A recognized clause-introducing keyword, single- or multi-word.
/// Multi-word forms (`INSERT INTO`) are folded into one token by the
/// scanner so the state machine never has to look ahead across spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    With,
    As,
    Select,
    From,
    Join,
    InnerJoin,
    LeftJoin,
    RightJoin,
    FullJoin,
    CrossJoin,
    On,
    And,
    Or,
    Where,
    GroupBy,
    OrderBy,
    Having,
    Update,
    InsertInto,
    DeleteFrom,
    MergeInto,
    Exec,
    Execute,
    Call,
    Declare,
    Cursor,
}

impl Keyword {
    /// Does this keyword place the following identifier in a "table
    /// position" (FROM/JOIN family), and if so, what CRUD bit and edge
    /// kind does it imply?
    pub fn is_table_position(self) -> bool {
        matches!(
            self,
            Keyword::From
                | Keyword::Join
                | Keyword::InnerJoin
                | Keyword::LeftJoin
                | Keyword::RightJoin
                | Keyword::FullJoin
                | Keyword::CrossJoin
                | Keyword::Update
                | Keyword::InsertInto
                | Keyword::DeleteFrom
                | Keyword::MergeInto
        )
    }

    pub fn is_join_family(self) -> bool {
        matches!(
            self,
            Keyword::Join
                | Keyword::InnerJoin
                | Keyword::LeftJoin
                | Keyword::RightJoin
                | Keyword::FullJoin
                | Keyword::CrossJoin
        )
    }

    pub fn is_call(self) -> bool {
        matches!(self, Keyword::Exec | Keyword::Execute | Keyword::Call)
    }

    /// A clause keyword that ends an ON-predicate search.
    pub fn ends_on_clause(self) -> bool {
        matches!(
            self,
            Keyword::Where
                | Keyword::GroupBy
                | Keyword::OrderBy
                | Keyword::Having
                | Keyword::Join
                | Keyword::InnerJoin
                | Keyword::LeftJoin
                | Keyword::RightJoin
                | Keyword::FullJoin
                | Keyword::CrossJoin
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Keyword(Keyword),
    /// Identifier text, quotes/brackets already stripped.
    Ident(String),
    Dot,
    Comma,
    LParen,
    RParen,
    Eq,
    Semicolon,
    Star,
    /// Any other punctuation/operator, not interpreted further.
    Other(String),
}

fn ident_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_#@][A-Za-z0-9_#@$]*$").unwrap())
}

/// Classifies a single already-extracted word as a keyword, possibly
/// folding in the next word for two-word forms. Returns the keyword and
/// how many source words it consumed (1 or 2).
pub fn classify_keyword(word: &str, next: Option<&str>) -> Option<(Keyword, usize)> {
    let upper = word.to_ascii_uppercase();
    let next_upper = next.map(|n| n.to_ascii_uppercase());

    macro_rules! two {
        ($a:literal, $b:literal, $kw:expr) => {
            if upper == $a && next_upper.as_deref() == Some($b) {
                return Some(($kw, 2));
            }
        };
    }

    two!("INSERT", "INTO", Keyword::InsertInto);
    two!("DELETE", "FROM", Keyword::DeleteFrom);
    two!("MERGE", "INTO", Keyword::MergeInto);
    two!("INNER", "JOIN", Keyword::InnerJoin);
    two!("LEFT", "JOIN", Keyword::LeftJoin);
    two!("RIGHT", "JOIN", Keyword::RightJoin);
    two!("FULL", "JOIN", Keyword::FullJoin);
    two!("CROSS", "JOIN", Keyword::CrossJoin);
    two!("GROUP", "BY", Keyword::GroupBy);
    two!("ORDER", "BY", Keyword::OrderBy);

    let single = match upper.as_str() {
        "WITH" => Keyword::With,
        "AS" => Keyword::As,
        "SELECT" => Keyword::Select,
        "FROM" => Keyword::From,
        "JOIN" => Keyword::Join,
        "ON" => Keyword::On,
        "AND" => Keyword::And,
        "OR" => Keyword::Or,
        "WHERE" => Keyword::Where,
        "HAVING" => Keyword::Having,
        "UPDATE" => Keyword::Update,
        "EXEC" => Keyword::Exec,
        "EXECUTE" => Keyword::Execute,
        "CALL" => Keyword::Call,
        "DECLARE" => Keyword::Declare,
        "CURSOR" => Keyword::Cursor,
        _ => return None,
    };
    Some((single, 1))
}

pub fn is_ident_word(word: &str) -> bool {
    ident_start_re().is_match(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_two_word_keyword() {
        assert_eq!(
            classify_keyword("insert", Some("into")),
            Some((Keyword::InsertInto, 2))
        );
    }

    #[test]
    fn falls_back_to_single_word() {
        assert_eq!(classify_keyword("FROM", Some("dbo")), Some((Keyword::From, 1)));
    }

    #[test]
    fn non_keyword_returns_none() {
        assert_eq!(classify_keyword("Students", None), None);
    }

    #[test]
    fn ident_word_rejects_leading_digit() {
        assert!(!is_ident_word("1table"));
        assert!(is_ident_word("_temp"));
        assert!(is_ident_word("#temp"));
        assert!(is_ident_word("@var"));
    }
}
