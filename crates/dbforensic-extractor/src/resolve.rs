// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Resolve a raw (possibly schema-qualified, possibly bare) name scanned
//! out of a body against the set of FQNs the catalog actually knows
//! about.

use std::collections::HashSet;

use dbforensic_catalog::Fqn;

/// A raw name as scanned: either `schema.name` (explicit) or just `name`
/// (to be resolved against the default schema, then searched across all
/// schemas if that misses).
pub struct RawName<'a> {
    pub schema: Option<&'a str>,
    pub name: &'a str,
}

/// Outcome of resolving one raw name.
pub enum Resolution {
    Known(Fqn),
    /// Not found anywhere in the known set, most often a temp table,
    /// table variable, or CTE reference; never an error (malformed or
    /// unrecognized input contributes nothing, silently).
    Unknown,
    /// An unqualified name matched more than one schema; the caller
    /// should both emit a warning and treat this as unresolved.
    Ambiguous,
}

/// Resolve `raw` against `known` (table/view FQNs) using `default_schema`
/// as the first guess for unqualified names.
pub fn resolve(raw: &RawName<'_>, known: &HashSet<Fqn>, default_schema: &str) -> Resolution {
    if raw.name.starts_with('#') || raw.name.starts_with('@') {
        return Resolution::Unknown;
    }

    if let Some(schema) = raw.schema {
        let candidate = Fqn::new(schema, raw.name);
        return if known.contains(&candidate) {
            Resolution::Known(candidate)
        } else {
            Resolution::Unknown
        };
    }

    let default_candidate = Fqn::new(default_schema, raw.name);
    if known.contains(&default_candidate) {
        return Resolution::Known(default_candidate);
    }

    let matches: Vec<&Fqn> = known.iter().filter(|fqn| fqn.name_eq(raw.name)).collect();
    match matches.len() {
        0 => Resolution::Unknown,
        1 => Resolution::Known(matches[0].clone()),
        _ => Resolution::Ambiguous,
    }
}
