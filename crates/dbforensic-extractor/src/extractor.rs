// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The table-position state machine, join-pair and anti-pattern detection,
//! and resolution against the known catalog.

use std::collections::{HashMap, HashSet};

use dbforensic_catalog::Fqn;
use serde::{Deserialize, Serialize};

use crate::normalize::strip_comments_and_strings;
use crate::resolve::{resolve, RawName, Resolution};
use crate::scan::scan;
use crate::token::{Keyword, Token};

/// Read/Create/Update/Delete attribution for one table, accumulated
/// across every statement in a body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrudFlags {
    pub read: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl CrudFlags {
    pub fn any(&self) -> bool {
        self.read || self.create || self.update || self.delete
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntiPattern {
    SelectStar,
    NoLockHint,
    CursorDeclared,
    DynamicSql,
    GlobalTempTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractorWarning {
    /// An unqualified name matched more than one schema and could not be
    /// disambiguated.
    AmbiguousIdentifier { raw_name: String },
}

/// Output of scanning one routine/view body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub referenced: HashSet<Fqn>,
    pub joins: HashSet<(Fqn, Fqn)>,
    pub crud: HashMap<Fqn, CrudFlags>,
    pub called_routines: HashSet<Fqn>,
    pub anti_patterns: HashSet<AntiPattern>,
    pub warnings: Vec<ExtractorWarning>,
}

/// Scan `body` for table/view/routine references, joins, CRUD
/// attribution, and anti-patterns.
///
/// `known_relations` is the set of table/view FQNs the catalog actually
/// has (used to resolve unqualified names); `known_routines` is the
/// equivalent set for `EXEC`/`CALL` targets.
pub fn extract(
    body: &str,
    default_schema: &str,
    known_relations: &HashSet<Fqn>,
    known_routines: &HashSet<Fqn>,
) -> ExtractionResult {
    let normalized = strip_comments_and_strings(body);
    let tokens = scan(&normalized);
    let cte_names = collect_cte_names(&tokens);

    let mut result = ExtractionResult::default();
    let mut alias_map: HashMap<String, Option<Fqn>> = HashMap::new();

    detect_anti_patterns(&tokens, &mut result.anti_patterns);

    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Keyword(kw) if kw.is_table_position() => {
                i = handle_table_position(
                    *kw,
                    &tokens,
                    i + 1,
                    default_schema,
                    known_relations,
                    &cte_names,
                    &mut alias_map,
                    &mut result,
                );
            }
            Token::Keyword(Keyword::On) => {
                i = handle_on_clause(&tokens, i + 1, &alias_map, &mut result.joins);
            }
            Token::Keyword(kw) if kw.is_call() => {
                i = handle_call(&tokens, i + 1, default_schema, known_routines, &mut result);
            }
            _ => i += 1,
        }
    }

    tracing::debug!(
        referenced = result.referenced.len(),
        joins = result.joins.len(),
        called_routines = result.called_routines.len(),
        warnings = result.warnings.len(),
        "extraction complete"
    );

    result
}

/// A table name as scanned, with its optional alias, and the index just
/// past everything consumed (name, optional column-qualifier, alias).
struct ParsedTable {
    schema: Option<String>,
    name: String,
    alias: Option<String>,
    next: usize,
}

/// Parse `[schema.]name [[AS] alias]` starting at `i`.
fn parse_table(tokens: &[Token], i: usize) -> Option<ParsedTable> {
    let Some(Token::Ident(first)) = tokens.get(i) else {
        return None;
    };

    let (schema, name, mut j) = if tokens.get(i + 1) == Some(&Token::Dot) {
        match tokens.get(i + 2) {
            Some(Token::Ident(second)) => (Some(first.clone()), second.clone(), i + 3),
            _ => (None, first.clone(), i + 1),
        }
    } else {
        (None, first.clone(), i + 1)
    };

    let alias = match tokens.get(j) {
        Some(Token::Keyword(Keyword::As)) => match tokens.get(j + 1) {
            Some(Token::Ident(alias)) => {
                j += 2;
                Some(alias.clone())
            }
            _ => {
                j += 1;
                None
            }
        },
        Some(Token::Ident(alias)) => {
            let alias = alias.clone();
            j += 1;
            Some(alias)
        }
        _ => None,
    };

    Some(ParsedTable {
        schema,
        name,
        alias,
        next: j,
    })
}

#[allow(clippy::too_many_arguments)]
fn handle_table_position(
    kw: Keyword,
    tokens: &[Token],
    start: usize,
    default_schema: &str,
    known_relations: &HashSet<Fqn>,
    cte_names: &HashSet<String>,
    alias_map: &mut HashMap<String, Option<Fqn>>,
    result: &mut ExtractionResult,
) -> usize {
    let mut i = start;
    loop {
        let Some(parsed) = parse_table(tokens, i) else {
            break;
        };
        i = parsed.next;
        record_table_reference(kw, parsed, default_schema, known_relations, cte_names, alias_map, result);

        // Old-style comma-separated FROM list: `FROM A, B`.
        if kw == Keyword::From && tokens.get(i) == Some(&Token::Comma) {
            i += 1;
            continue;
        }
        break;
    }
    i
}

#[allow(clippy::too_many_arguments)]
fn record_table_reference(
    kw: Keyword,
    parsed: ParsedTable,
    default_schema: &str,
    known_relations: &HashSet<Fqn>,
    cte_names: &HashSet<String>,
    alias_map: &mut HashMap<String, Option<Fqn>>,
    result: &mut ExtractionResult,
) {
    let ParsedTable {
        schema,
        name,
        alias,
        ..
    } = parsed;

    let resolved = if schema.is_none() && cte_names.contains(&name.to_ascii_lowercase()) {
        None
    } else {
        let raw = RawName {
            schema: schema.as_deref(),
            name: &name,
        };
        match resolve(&raw, known_relations, default_schema) {
            Resolution::Known(fqn) => Some(fqn),
            Resolution::Unknown => None,
            Resolution::Ambiguous => {
                result.warnings.push(ExtractorWarning::AmbiguousIdentifier {
                    raw_name: name.clone(),
                });
                None
            }
        }
    };

    if let Some(fqn) = &resolved {
        result.referenced.insert(fqn.clone());
        let flags = result.crud.entry(fqn.clone()).or_default();
        match kw {
            Keyword::From | Keyword::Join | Keyword::InnerJoin | Keyword::LeftJoin | Keyword::RightJoin
            | Keyword::FullJoin | Keyword::CrossJoin => flags.read = true,
            Keyword::Update => flags.update = true,
            Keyword::InsertInto => flags.create = true,
            Keyword::DeleteFrom => flags.delete = true,
            Keyword::MergeInto => flags.update = true,
            _ => {}
        }
    }

    // The bare table name is always a valid reference to itself; an
    // explicit alias, if present, is an additional name for the same
    // table.
    alias_map.insert(name.to_ascii_lowercase(), resolved.clone());
    if let Some(alias) = alias {
        alias_map.insert(alias.to_ascii_lowercase(), resolved);
    }
}

fn handle_on_clause(
    tokens: &[Token],
    start: usize,
    alias_map: &HashMap<String, Option<Fqn>>,
    joins: &mut HashSet<(Fqn, Fqn)>,
) -> usize {
    let mut i = start;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Keyword(kw) if kw.ends_on_clause() => break,
            Token::Semicolon => break,
            _ => {}
        }

        if let [Token::Ident(a1), Token::Dot, Token::Ident(_c1), Token::Eq, Token::Ident(a2), Token::Dot, Token::Ident(_c2)] =
            &tokens[i..(i + 7).min(tokens.len())]
        {
            if let (Some(Some(t1)), Some(Some(t2))) = (
                alias_map.get(&a1.to_ascii_lowercase()),
                alias_map.get(&a2.to_ascii_lowercase()),
            ) {
                if t1 != t2 {
                    let pair = if t1 < t2 {
                        (t1.clone(), t2.clone())
                    } else {
                        (t2.clone(), t1.clone())
                    };
                    joins.insert(pair);
                }
            }
            i += 7;
            continue;
        }
        i += 1;
    }
    i
}

fn handle_call(
    tokens: &[Token],
    start: usize,
    default_schema: &str,
    known_routines: &HashSet<Fqn>,
    result: &mut ExtractionResult,
) -> usize {
    let Some(parsed) = parse_table(tokens, start) else {
        return start;
    };
    let raw = RawName {
        schema: parsed.schema.as_deref(),
        name: &parsed.name,
    };
    if let Resolution::Known(fqn) = resolve(&raw, known_routines, default_schema) {
        result.called_routines.insert(fqn);
    }
    // `parse_table`'s speculative alias capture has no meaning for a
    // routine name; it's fine if it swallows one trailing token (e.g. a
    // bare parameter) since this scanner never parses argument lists.
    parsed.next
}

fn collect_cte_names(tokens: &[Token]) -> HashSet<String> {
    let mut ctes = HashSet::new();
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i] != Token::Keyword(Keyword::With) {
            i += 1;
            continue;
        }
        i += 1;
        // A `WITH (NOLOCK)` table hint is not a CTE introducer.
        if tokens.get(i) == Some(&Token::LParen) {
            continue;
        }
        if let Some(Token::Ident(w)) = tokens.get(i) {
            if w.eq_ignore_ascii_case("recursive") {
                i += 1;
            }
        }
        loop {
            let Some(Token::Ident(name)) = tokens.get(i) else {
                break;
            };
            let name = name.clone();
            i += 1;
            if tokens.get(i) == Some(&Token::LParen) {
                i = skip_parens(tokens, i);
            }
            if tokens.get(i) == Some(&Token::Keyword(Keyword::As)) {
                i += 1;
                if tokens.get(i) == Some(&Token::LParen) {
                    ctes.insert(name.to_ascii_lowercase());
                    i = skip_parens(tokens, i);
                }
            }
            if tokens.get(i) == Some(&Token::Comma) {
                i += 1;
                continue;
            }
            break;
        }
    }
    ctes
}

/// `tokens[i]` must be `LParen`; returns the index just past its matching
/// `RParen`, or `tokens.len()` if unterminated (malformed input degrades
/// rather than panicking).
fn skip_parens(tokens: &[Token], i: usize) -> usize {
    let mut depth = 0i32;
    let mut j = i;
    while j < tokens.len() {
        match tokens[j] {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return j + 1;
                }
            }
            _ => {}
        }
        j += 1;
    }
    tokens.len()
}

fn detect_anti_patterns(tokens: &[Token], flags: &mut HashSet<AntiPattern>) {
    for w in tokens.windows(2) {
        if w[0] == Token::Keyword(Keyword::Select) && w[1] == Token::Star {
            flags.insert(AntiPattern::SelectStar);
        }
        if matches!(w[0], Token::Keyword(Keyword::Exec) | Token::Keyword(Keyword::Execute))
            && w[1] == Token::LParen
        {
            flags.insert(AntiPattern::DynamicSql);
        }
    }
    for t in tokens {
        if let Token::Ident(name) = t {
            if name.eq_ignore_ascii_case("nolock") {
                flags.insert(AntiPattern::NoLockHint);
            }
            if name.eq_ignore_ascii_case("sp_executesql") {
                flags.insert(AntiPattern::DynamicSql);
            }
            if name.starts_with("##") {
                flags.insert(AntiPattern::GlobalTempTable);
            }
        }
    }
    if has_declare_cursor(tokens) {
        flags.insert(AntiPattern::CursorDeclared);
    }
}

fn has_declare_cursor(tokens: &[Token]) -> bool {
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i] == Token::Keyword(Keyword::Declare) {
            let mut j = i + 1;
            while j < tokens.len() && tokens[j] != Token::Semicolon {
                if tokens[j] == Token::Keyword(Keyword::Cursor) {
                    return true;
                }
                j += 1;
            }
        }
        i += 1;
    }
    false
}
