// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! A pure function from routine body text to a complexity score and
//! category. Operates on the same normalized body the extractor already
//! produces, so it lives alongside [`crate::extractor`] rather than in its
//! own crate.

use serde::{Deserialize, Serialize};

use crate::normalize::{non_blank_line_count, strip_comments_and_strings};
use crate::token::{classify_keyword, is_ident_word};

/// Complexity category assigned from the total score. Boundaries are
/// inclusive on the lower category by the tie-break rule: `20` and
/// `50` both land in `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityCategory {
    Simple,
    Medium,
    Complex,
}

/// The weighted-sum complexity score for one routine body, plus its
/// per-dimension contributions (capped) for diagnostic display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityScore {
    pub total: f64,
    pub category: ComplexityCategory,
    pub size: f64,
    pub joins: f64,
    pub subqueries: f64,
    pub cursors: f64,
    pub temp_tables: f64,
    pub dynamic_sql: f64,
    pub control_flow: f64,
}

/// Score `body` across the weighted dimension table. Each dimension is
/// computed independently, capped, then summed; the category assignment
/// pins the 20/50 tie-breaks to the lower band.
pub fn score(body: &str) -> ComplexityScore {
    let normalized = strip_comments_and_strings(body);
    let words = lex_words(&normalized);

    let size = (non_blank_line_count(body) as f64 * 0.1).min(30.0);
    let joins = (count_join_keywords(&words) as f64 * 3.0).min(30.0);
    let subqueries = (max_subquery_depth(&words) as f64 * 5.0).min(25.0);
    let cursors = (count_declare_cursor(&words) as f64 * 8.0).min(16.0);
    let temp_tables = (count_distinct_temp_tables(&words) as f64 * 2.0).min(12.0);
    let dynamic_sql = if has_dynamic_sql(&words) { 10.0 } else { 0.0 };
    let control_flow = (count_control_flow(&words) as f64).min(15.0);

    let total = size + joins + subqueries + cursors + temp_tables + dynamic_sql + control_flow;
    let category = categorize(total);

    ComplexityScore {
        total,
        category,
        size,
        joins,
        subqueries,
        cursors,
        temp_tables,
        dynamic_sql,
        control_flow,
    }
}

fn categorize(total: f64) -> ComplexityCategory {
    if total < 20.0 {
        ComplexityCategory::Simple
    } else if total <= 50.0 {
        ComplexityCategory::Medium
    } else {
        ComplexityCategory::Complex
    }
}

/// A cheap word-level lex shared by every dimension below, coarser than
/// [`crate::scan::scan`] since the scorer only ever needs keyword/paren
/// counting, never table-position resolution.
fn lex_words(normalized: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut chars = normalized.char_indices().peekable();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c.is_alphanumeric() || c == '_' || c == '#' || c == '@' {
            let mut w = String::new();
            while let Some(&(_, ch)) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' || ch == '#' || ch == '@' {
                    w.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            words.push(w);
            continue;
        }
        chars.next();
        words.push(c.to_string());
    }
    words
}

fn count_join_keywords(words: &[String]) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < words.len() {
        let next = words.get(i + 1).map(|s| s.as_str());
        if let Some((kw, consumed)) = classify_keyword(&words[i], next) {
            if kw.is_join_family() {
                count += 1;
            }
            i += consumed;
            continue;
        }
        i += 1;
    }
    count
}

/// Max nesting depth of `(` immediately preceding a `SELECT` token, for
/// the "subqueries" dimension.
fn max_subquery_depth(words: &[String]) -> usize {
    let mut depth = 0usize;
    let mut max_select_depth = 0usize;
    for w in words {
        match w.as_str() {
            "(" => depth += 1,
            ")" => depth = depth.saturating_sub(1),
            w if w.eq_ignore_ascii_case("select") && depth > 0 => {
                max_select_depth = max_select_depth.max(depth);
            }
            _ => {}
        }
    }
    max_select_depth
}

fn count_declare_cursor(words: &[String]) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < words.len() {
        if words[i].eq_ignore_ascii_case("declare") {
            let mut j = i + 1;
            while j < words.len() && words[j] != ";" {
                if words[j].eq_ignore_ascii_case("cursor") {
                    count += 1;
                    break;
                }
                j += 1;
            }
        }
        i += 1;
    }
    count
}

fn count_distinct_temp_tables(words: &[String]) -> usize {
    use std::collections::HashSet;
    let mut names = HashSet::new();
    for w in words {
        if is_ident_word(w) && w.starts_with('#') && !w.starts_with("##") {
            names.insert(w.to_ascii_lowercase());
        }
    }
    names.len()
}

fn has_dynamic_sql(words: &[String]) -> bool {
    for i in 0..words.len() {
        let is_exec = words[i].eq_ignore_ascii_case("exec") || words[i].eq_ignore_ascii_case("execute");
        if is_exec && words.get(i + 1).map(|s| s.as_str()) == Some("(") {
            return true;
        }
        if words[i].eq_ignore_ascii_case("sp_executesql") {
            return true;
        }
    }
    false
}

fn count_control_flow(words: &[String]) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < words.len() {
        let w = &words[i];
        if w.eq_ignore_ascii_case("if") {
            count += 1;
        } else if w.eq_ignore_ascii_case("while") {
            count += 1;
        } else if w.eq_ignore_ascii_case("case")
            && words
                .get(i + 1..)
                .and_then(|rest| rest.iter().find(|w| !w.trim().is_empty()))
                .map(|w| w.eq_ignore_ascii_case("when"))
                .unwrap_or(false)
        {
            count += 1;
        }
        i += 1;
    }
    count
}
