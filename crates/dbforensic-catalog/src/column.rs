// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Column metadata: declared type text plus a normalized, comparable shape.

use serde::{Deserialize, Serialize};

/// Coarse classification of a column's declared SQL type, used by the
/// naming heuristic (type-compatibility check) and the diff engine
/// (widening/narrowing classification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    Float,
    Double,
    Char,
    Varchar,
    Text,
    Binary,
    VarBinary,
    Blob,
    Date,
    Time,
    DateTime,
    Timestamp,
    Boolean,
    Json,
    Uuid,
    Other,
}

impl TypeKind {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            TypeKind::TinyInt | TypeKind::SmallInt | TypeKind::Integer | TypeKind::BigInt
        )
    }

    pub fn is_string(&self) -> bool {
        matches!(self, TypeKind::Char | TypeKind::Varchar | TypeKind::Text)
    }

    /// Ordinal width used to classify integer widening (bigger width = wider).
    pub fn integer_width(&self) -> Option<u8> {
        match self {
            TypeKind::TinyInt => Some(1),
            TypeKind::SmallInt => Some(2),
            TypeKind::Integer => Some(4),
            TypeKind::BigInt => Some(8),
            _ => None,
        }
    }

    /// Best-effort classification from a raw, dialect-specific type name.
    pub fn from_raw(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        let base = lower.split(['(', ' ']).next().unwrap_or(&lower);
        match base {
            "tinyint" => TypeKind::TinyInt,
            "smallint" | "int2" => TypeKind::SmallInt,
            "int" | "integer" | "int4" | "serial" => TypeKind::Integer,
            "bigint" | "int8" | "bigserial" => TypeKind::BigInt,
            "decimal" | "numeric" | "money" => TypeKind::Decimal,
            "float" | "float4" | "real" => TypeKind::Float,
            "double" | "float8" | "double precision" => TypeKind::Double,
            "char" | "character" | "nchar" => TypeKind::Char,
            "varchar" | "nvarchar" | "character varying" => TypeKind::Varchar,
            "text" | "ntext" | "clob" => TypeKind::Text,
            "binary" => TypeKind::Binary,
            "varbinary" | "bytea" => TypeKind::VarBinary,
            "blob" | "image" => TypeKind::Blob,
            "date" => TypeKind::Date,
            "time" => TypeKind::Time,
            "datetime" | "datetime2" | "smalldatetime" => TypeKind::DateTime,
            "timestamp" | "timestamptz" => TypeKind::Timestamp,
            "bit" | "bool" | "boolean" => TypeKind::Boolean,
            "json" | "jsonb" => TypeKind::Json,
            "uniqueidentifier" | "uuid" => TypeKind::Uuid,
            _ => TypeKind::Other,
        }
    }
}

/// Normalized `(kind, length, precision, scale)` view of a declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedType {
    pub kind: TypeKind,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl NormalizedType {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            length: None,
            precision: None,
            scale: None,
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision_scale(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Parse a raw declared type string (`"varchar(255)"`, `"decimal(10,2)"`)
    /// into its normalized shape.
    pub fn parse(raw: &str) -> Self {
        let kind = TypeKind::from_raw(raw);
        let args = raw
            .find('(')
            .and_then(|start| raw[start + 1..].find(')').map(|end| &raw[start + 1..start + 1 + end]));
        let mut out = NormalizedType::new(kind);
        if let Some(args) = args {
            let parts: Vec<u32> = args.split(',').filter_map(|p| p.trim().parse().ok()).collect();
            match parts.as_slice() {
                [single] if kind.is_string() || kind == TypeKind::Binary || kind == TypeKind::VarBinary => {
                    out.length = Some(*single);
                }
                [precision, scale] => {
                    out.precision = Some(*precision);
                    out.scale = Some(*scale);
                }
                [single] => {
                    out.precision = Some(*single);
                }
                _ => {}
            }
        }
        out
    }
}

/// Metadata for a single table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ordinal: u32,
    pub raw_type: String,
    pub normalized_type: NormalizedType,
    pub nullable: bool,
    pub default_expr: Option<String>,
    pub is_identity: bool,
    pub is_computed: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, ordinal: u32, raw_type: impl Into<String>) -> Self {
        let raw_type = raw_type.into();
        let normalized_type = NormalizedType::parse(&raw_type);
        Self {
            name: name.into(),
            ordinal,
            raw_type,
            normalized_type,
            nullable: true,
            default_expr: None,
            is_identity: false,
            is_computed: false,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_default(mut self, expr: impl Into<String>) -> Self {
        self.default_expr = Some(expr.into());
        self
    }

    pub fn with_identity(mut self, is_identity: bool) -> Self {
        self.is_identity = is_identity;
        self
    }

    pub fn with_computed(mut self, is_computed: bool) -> Self {
        self.is_computed = is_computed;
        self
    }

    pub fn name_eq(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_varchar_length() {
        let t = NormalizedType::parse("varchar(255)");
        assert_eq!(t.kind, TypeKind::Varchar);
        assert_eq!(t.length, Some(255));
    }

    #[test]
    fn parses_decimal_precision_scale() {
        let t = NormalizedType::parse("decimal(10,2)");
        assert_eq!(t.kind, TypeKind::Decimal);
        assert_eq!(t.precision, Some(10));
        assert_eq!(t.scale, Some(2));
    }

    #[test]
    fn bare_type_has_no_dimensions() {
        let t = NormalizedType::parse("int");
        assert_eq!(t.kind, TypeKind::Integer);
        assert!(t.length.is_none());
    }

    #[test]
    fn integer_width_orders_by_size() {
        assert!(TypeKind::BigInt.integer_width() > TypeKind::Integer.integer_width());
        assert!(TypeKind::Integer.integer_width() > TypeKind::SmallInt.integer_width());
    }

    #[test]
    fn unknown_type_falls_back_to_other() {
        assert_eq!(TypeKind::from_raw("hierarchyid"), TypeKind::Other);
    }
}
