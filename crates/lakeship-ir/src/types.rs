//! Type system for call-site IR
//!
//! `PgType` is the concrete type identity of an expression in the primary
//! engine. `TypeSpec` is what a registry parameter position accepts: either a
//! concrete type or one of the polymorphic pseudo-type families.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("Empty type token")]
    Empty,

    #[error("Unknown type token: {0}")]
    UnknownToken(String),

    #[error("Polymorphic family {0} is not a concrete type")]
    NotConcrete(String),
}

/// Concrete type of an expression.
///
/// Serialized as its catalog token, e.g. `"int4"`, `"_float8"`, `"enum:mood"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PgType {
    /// Literal whose type has not been resolved at parse time
    Unknown,

    Bool,
    /// Single-byte internal `"char"`
    Char,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,

    // Text
    Text,
    Varchar,
    Bpchar,

    // Binary
    Bytea,
    Bit,
    Uuid,

    // Temporal
    Date,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Interval,

    // Documents
    Json,
    Jsonb,

    /// User-defined enum, by type name
    Enum(String),
    Array(Box<PgType>),

    /// Any other type the catalog has no special knowledge of
    Other(String),
}

impl PgType {
    pub fn array_of(element: PgType) -> Self {
        PgType::Array(Box::new(element))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, PgType::Array(_))
    }

    pub fn element_type(&self) -> Option<&PgType> {
        match self {
            PgType::Array(elem) => Some(elem),
            _ => None,
        }
    }

    fn builtin_name(&self) -> Option<&'static str> {
        let name = match self {
            PgType::Unknown => "unknown",
            PgType::Bool => "bool",
            PgType::Char => "char",
            PgType::Int2 => "int2",
            PgType::Int4 => "int4",
            PgType::Int8 => "int8",
            PgType::Float4 => "float4",
            PgType::Float8 => "float8",
            PgType::Numeric => "numeric",
            PgType::Text => "text",
            PgType::Varchar => "varchar",
            PgType::Bpchar => "bpchar",
            PgType::Bytea => "bytea",
            PgType::Bit => "bit",
            PgType::Uuid => "uuid",
            PgType::Date => "date",
            PgType::Time => "time",
            PgType::TimeTz => "timetz",
            PgType::Timestamp => "timestamp",
            PgType::TimestampTz => "timestamptz",
            PgType::Interval => "interval",
            PgType::Json => "json",
            PgType::Jsonb => "jsonb",
            PgType::Enum(_) | PgType::Array(_) | PgType::Other(_) => return None,
        };
        Some(name)
    }

    /// Parse a built-in type name or one of its SQL spellings.
    fn from_builtin_name(name: &str) -> Option<Self> {
        let ty = match name {
            "unknown" => PgType::Unknown,
            "bool" | "boolean" => PgType::Bool,
            "char" | "\"char\"" => PgType::Char,
            "int2" | "smallint" => PgType::Int2,
            "int4" | "int" | "integer" => PgType::Int4,
            "int8" | "bigint" => PgType::Int8,
            "float4" | "real" => PgType::Float4,
            "float8" | "double precision" => PgType::Float8,
            "numeric" | "decimal" => PgType::Numeric,
            "text" => PgType::Text,
            "varchar" | "character varying" => PgType::Varchar,
            "bpchar" | "character" => PgType::Bpchar,
            "bytea" => PgType::Bytea,
            "bit" => PgType::Bit,
            "uuid" => PgType::Uuid,
            "date" => PgType::Date,
            "time" | "time without time zone" => PgType::Time,
            "timetz" | "time with time zone" => PgType::TimeTz,
            "timestamp" | "timestamp without time zone" => PgType::Timestamp,
            "timestamptz" | "timestamp with time zone" => PgType::TimestampTz,
            "interval" => PgType::Interval,
            "json" => PgType::Json,
            "jsonb" => PgType::Jsonb,
            _ => return None,
        };
        Some(ty)
    }

    /// Strict parse: only built-in names, arrays of them, and `enum:` types.
    ///
    /// Registry tokens go through this so that a typo is a configuration
    /// error rather than a silent `Other`.
    pub fn parse_builtin(token: &str) -> Result<Self, TypeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TypeError::Empty);
        }
        if let Some(elem) = token.strip_prefix('_') {
            return Self::parse_builtin(elem).map(PgType::array_of);
        }
        if let Some(elem) = token.strip_suffix("[]") {
            return Self::parse_builtin(elem).map(PgType::array_of);
        }
        if let Some(name) = token.strip_prefix("enum:") {
            return Ok(PgType::Enum(name.to_string()));
        }
        Self::from_builtin_name(&token.to_ascii_lowercase())
            .ok_or_else(|| TypeError::UnknownToken(token.to_string()))
    }
}

impl fmt::Display for PgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PgType::Enum(name) => write!(f, "enum:{}", name),
            PgType::Array(elem) => write!(f, "_{}", elem),
            PgType::Other(name) => write!(f, "{}", name),
            other => f.write_str(other.builtin_name().unwrap_or("unknown")),
        }
    }
}

impl FromStr for PgType {
    type Err = TypeError;

    /// Lenient parse for call sites: unrecognized names become `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::parse_builtin(s) {
            Ok(ty) => Ok(ty),
            Err(TypeError::UnknownToken(_)) => {
                let s = s.trim();
                if let Some(elem) = s.strip_prefix('_').or_else(|| s.strip_suffix("[]")) {
                    return elem.parse().map(PgType::array_of);
                }
                if PolyFamily::from_token(s).is_some() {
                    return Err(TypeError::NotConcrete(s.to_string()));
                }
                Ok(PgType::Other(s.to_string()))
            }
            Err(err) => Err(err),
        }
    }
}

impl TryFrom<String> for PgType {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PgType> for String {
    fn from(ty: PgType) -> Self {
        ty.to_string()
    }
}

/// Polymorphic pseudo-type families accepted by generic parameter positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolyFamily {
    Any,
    AnyElement,
    AnyArray,
    AnyNonArray,
    AnyEnum,
    AnyCompatible,
    AnyCompatibleArray,
}

impl PolyFamily {
    pub fn from_token(token: &str) -> Option<Self> {
        let family = match token {
            "any" | "\"any\"" => PolyFamily::Any,
            "anyelement" => PolyFamily::AnyElement,
            "anyarray" => PolyFamily::AnyArray,
            "anynonarray" => PolyFamily::AnyNonArray,
            "anyenum" => PolyFamily::AnyEnum,
            "anycompatible" => PolyFamily::AnyCompatible,
            "anycompatiblearray" => PolyFamily::AnyCompatibleArray,
            _ => return None,
        };
        Some(family)
    }

    pub fn token(&self) -> &'static str {
        match self {
            PolyFamily::Any => "any",
            PolyFamily::AnyElement => "anyelement",
            PolyFamily::AnyArray => "anyarray",
            PolyFamily::AnyNonArray => "anynonarray",
            PolyFamily::AnyEnum => "anyenum",
            PolyFamily::AnyCompatible => "anycompatible",
            PolyFamily::AnyCompatibleArray => "anycompatiblearray",
        }
    }

    /// Families whose positions must agree on a common type
    pub fn requires_unification(&self) -> bool {
        matches!(self, PolyFamily::AnyCompatible | PolyFamily::AnyCompatibleArray)
    }
}

impl fmt::Display for PolyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// What a single parameter position of a registry rule accepts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Concrete(PgType),
    Polymorphic(PolyFamily),
}

impl TypeSpec {
    pub fn is_polymorphic(&self) -> bool {
        matches!(self, TypeSpec::Polymorphic(_))
    }

    pub fn family(&self) -> Option<PolyFamily> {
        match self {
            TypeSpec::Polymorphic(family) => Some(*family),
            TypeSpec::Concrete(_) => None,
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Concrete(ty) => write!(f, "{}", ty),
            TypeSpec::Polymorphic(family) => write!(f, "{}", family),
        }
    }
}
