use regex::Regex;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;
use tracing::debug;

/// A source column type, split into its base name and an optional size.
///
/// `VARCHAR(255)` parses into base name `VARCHAR` and size `255`. A type string without a
/// discernible base name (empty, or something like `(12)`) parses into an empty base name,
/// which maps to the fallback type.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct TypeDescriptor {
    pub base_name: String,
    pub size: Option<u32>,
}

static TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*(?:\s+[A-Za-z_][A-Za-z0-9_]*)*)\s*(?:\(\s*(\d+)\s*\))?")
        .expect("type pattern is valid")
});

impl TypeDescriptor {
    pub fn new(base_name: &str, size: Option<u32>) -> Self {
        TypeDescriptor {
            base_name: base_name.to_uppercase(),
            size,
        }
    }

    pub fn parse(raw_type: &str) -> Self {
        let Some(captures) = TYPE_PATTERN.captures(raw_type) else {
            if !raw_type.trim().is_empty() {
                debug!(raw_type, "Malformed type string, no base name found");
            }
            return TypeDescriptor::default();
        };

        let base_name = captures[1]
            .split_whitespace()
            .map(|part| part.to_uppercase())
            .collect::<Vec<_>>()
            .join(" ");

        let size = captures.get(2).and_then(|s| s.as_str().parse().ok());

        TypeDescriptor { base_name, size }
    }
}

/// The Postgres types the mapper can produce.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TargetType {
    SmallInt,
    Integer,
    BigInt,
    Text,
    Varchar,
    Real,
    DoublePrecision,
    Numeric,
    Decimal,
    Boolean,
    Date,
    Timestamp,
    Bytea,
}

impl TargetType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            TargetType::SmallInt => "SMALLINT",
            TargetType::Integer => "INTEGER",
            TargetType::BigInt => "BIGINT",
            TargetType::Text => "TEXT",
            TargetType::Varchar => "VARCHAR",
            TargetType::Real => "REAL",
            TargetType::DoublePrecision => "DOUBLE PRECISION",
            TargetType::Numeric => "NUMERIC",
            TargetType::Decimal => "DECIMAL",
            TargetType::Boolean => "BOOLEAN",
            TargetType::Date => "DATE",
            TargetType::Timestamp => "TIMESTAMP",
            TargetType::Bytea => "BYTEA",
        }
    }

    /// Only bounded character types keep the size from the source.
    pub fn is_bounded_character(&self) -> bool {
        matches!(self, TargetType::Varchar)
    }

    /// Types whose default values have to be string literals.
    pub fn is_textual_or_temporal(&self) -> bool {
        matches!(
            self,
            TargetType::Text | TargetType::Varchar | TargetType::Date | TargetType::Timestamp
        )
    }
}

/// The result of mapping a source type.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MappedType {
    pub target: TargetType,
    pub size: Option<u32>,
}

impl Display for MappedType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.size {
            Some(size) => write!(f, "{}({})", self.target.as_sql(), size),
            None => f.write_str(self.target.as_sql()),
        }
    }
}

fn lookup(base_name: &str) -> Option<TargetType> {
    let target = match base_name {
        "INTEGER" | "INT" | "MEDIUMINT" => TargetType::Integer,
        "TINYINT" | "SMALLINT" | "INT2" => TargetType::SmallInt,
        "BIGINT" | "UNSIGNED BIG INT" | "INT8" => TargetType::BigInt,
        "TEXT" | "CLOB" => TargetType::Text,
        "CHARACTER" | "VARCHAR" | "VARYING CHARACTER" | "NCHAR" | "NATIVE CHARACTER"
        | "NVARCHAR" => TargetType::Varchar,
        "REAL" | "DOUBLE" | "DOUBLE PRECISION" => TargetType::DoublePrecision,
        "FLOAT" => TargetType::Real,
        "NUMERIC" => TargetType::Numeric,
        "DECIMAL" => TargetType::Decimal,
        "BOOLEAN" => TargetType::Boolean,
        "DATE" => TargetType::Date,
        "DATETIME" | "TIMESTAMP" => TargetType::Timestamp,
        "BLOB" => TargetType::Bytea,
        _ => return None,
    };

    Some(target)
}

/// Maps a SQLite type to the matching Postgres type.
///
/// Never fails: unknown and missing types become `TEXT`. Multi word types (`INT UNSIGNED`)
/// that are not known as a whole are retried with their first word.
pub fn map_type(source_type: &TypeDescriptor) -> MappedType {
    let base_name = source_type.base_name.to_uppercase();

    let target = lookup(&base_name)
        .or_else(|| {
            base_name
                .split_once(' ')
                .and_then(|(first_word, _)| lookup(first_word))
        })
        .unwrap_or_else(|| {
            if !base_name.is_empty() {
                debug!(%base_name, "Unrecognized source type, falling back to TEXT");
            }
            TargetType::Text
        });

    let size = if target.is_bounded_character() {
        source_type.size
    } else {
        None
    };

    MappedType { target, size }
}
