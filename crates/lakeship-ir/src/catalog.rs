//! Type catalog: token resolution, family membership and common-type
//! resolution for polymorphic parameters.

use crate::types::{PgType, PolyFamily, TypeError, TypeSpec};

/// Resolves type tokens and answers polymorphic-family questions.
///
/// The registry resolves its parameter tokens through this trait at
/// construction time, and the matcher asks it about actual argument types.
pub trait TypeCatalog: Send + Sync {
    /// Resolve a type token (e.g. `"int4"`, `"anyelement"`, `"_float8"`)
    fn resolve(&self, token: &str) -> Result<TypeSpec, TypeError>;

    /// Whether a concrete type is accepted by a polymorphic family
    fn is_member(&self, ty: &PgType, family: PolyFamily) -> bool;

    /// Common type that every input can be implicitly coerced to, if any
    fn common_type(&self, types: &[&PgType]) -> Option<PgType>;
}

/// Implicit-coercion category, the way the primary engine groups types when
/// looking for a common type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Numeric,
    String,
    DateTime,
    Time,
    Exact,
}

fn category(ty: &PgType) -> Category {
    match ty {
        PgType::Int2
        | PgType::Int4
        | PgType::Int8
        | PgType::Numeric
        | PgType::Float4
        | PgType::Float8 => Category::Numeric,
        PgType::Text | PgType::Varchar | PgType::Bpchar => Category::String,
        PgType::Date | PgType::Timestamp | PgType::TimestampTz => Category::DateTime,
        PgType::Time | PgType::TimeTz => Category::Time,
        _ => Category::Exact,
    }
}

/// Position along the implicit-cast chain within a category; a type can be
/// implicitly coerced to every type with a higher rank.
fn rank(ty: &PgType) -> u8 {
    match ty {
        PgType::Int2 | PgType::Date | PgType::Time => 0,
        PgType::Int4 | PgType::Timestamp | PgType::TimeTz => 1,
        PgType::Int8 | PgType::TimestampTz => 2,
        PgType::Numeric => 3,
        PgType::Float4 => 4,
        PgType::Float8 => 5,
        _ => 0,
    }
}

/// Catalog of the primary engine's built-in types
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTypeCatalog;

impl TypeCatalog for BuiltinTypeCatalog {
    fn resolve(&self, token: &str) -> Result<TypeSpec, TypeError> {
        if let Some(family) = PolyFamily::from_token(token.trim()) {
            return Ok(TypeSpec::Polymorphic(family));
        }
        PgType::parse_builtin(token).map(TypeSpec::Concrete)
    }

    fn is_member(&self, ty: &PgType, family: PolyFamily) -> bool {
        match family {
            PolyFamily::Any | PolyFamily::AnyElement | PolyFamily::AnyCompatible => true,
            PolyFamily::AnyArray | PolyFamily::AnyCompatibleArray => ty.is_array(),
            PolyFamily::AnyNonArray => !ty.is_array(),
            PolyFamily::AnyEnum => matches!(ty, PgType::Enum(_)),
        }
    }

    fn common_type(&self, types: &[&PgType]) -> Option<PgType> {
        let mut known = types.iter().filter(|ty| ***ty != PgType::Unknown);

        let Some(first) = known.next() else {
            // Only untyped literals: they resolve as text
            return Some(PgType::Text);
        };

        let mut common = (*first).clone();
        for ty in known {
            let ty = *ty;
            if *ty == common {
                continue;
            }
            match (category(&common), category(ty)) {
                (Category::Numeric, Category::Numeric)
                | (Category::DateTime, Category::DateTime)
                | (Category::Time, Category::Time) => {
                    if rank(ty) > rank(&common) {
                        common = ty.clone();
                    }
                }
                (Category::String, Category::String) => common = PgType::Text,
                _ => return None,
            }
        }
        Some(common)
    }
}
