//! Shippability rules

use lakeship_ir::{FunctionKind, TypeCatalog, TypeSpec};
use serde::Serialize;
use std::fmt;

use crate::validators::Validator;
use crate::RegistryError;

/// Rule as written in a static table: parameter types are catalog tokens,
/// resolved when the registry is built.
#[derive(Debug, Clone, Copy)]
pub struct RuleDef {
    pub name: &'static str,
    pub kind: FunctionKind,
    pub arity: usize,
    pub params: &'static [&'static str],
    pub variadic: bool,
    pub validator: Option<Validator>,
}

impl RuleDef {
    pub const fn new(
        name: &'static str,
        kind: FunctionKind,
        arity: usize,
        params: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            kind,
            arity,
            params,
            variadic: false,
            validator: None,
        }
    }

    /// The last parameter is `VARIADIC` and absorbs one or more arguments
    pub const fn variadic(self) -> Self {
        Self { variadic: true, ..self }
    }

    pub const fn validated(self, validator: Validator) -> Self {
        Self {
            validator: Some(validator),
            ..self
        }
    }
}

pub const fn agg(name: &'static str, arity: usize, params: &'static [&'static str]) -> RuleDef {
    RuleDef::new(name, FunctionKind::Aggregate, arity, params)
}

pub const fn func(name: &'static str, arity: usize, params: &'static [&'static str]) -> RuleDef {
    RuleDef::new(name, FunctionKind::Scalar, arity, params)
}

pub const fn window(name: &'static str, arity: usize, params: &'static [&'static str]) -> RuleDef {
    RuleDef::new(name, FunctionKind::Window, arity, params)
}

/// A call shape known to produce identical results in both engines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippabilityRule {
    pub name: String,
    pub kind: FunctionKind,
    pub arity: usize,
    pub parameters: Vec<TypeSpec>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub variadic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<Validator>,
}

impl ShippabilityRule {
    pub(crate) fn resolve(def: &RuleDef, catalog: &dyn TypeCatalog) -> Result<Self, RegistryError> {
        if def.arity != def.params.len() {
            return Err(RegistryError::ArityMismatch {
                rule: def.name.to_string(),
                arity: def.arity,
                params: def.params.len(),
            });
        }
        if def.variadic && def.params.is_empty() {
            return Err(RegistryError::EmptyVariadic(def.name.to_string()));
        }

        let parameters = def
            .params
            .iter()
            .map(|token| {
                catalog.resolve(token).map_err(|source| RegistryError::UnknownType {
                    rule: def.name.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: def.name.to_string(),
            kind: def.kind,
            arity: def.arity,
            parameters,
            variadic: def.variadic,
            validator: def.validator,
        })
    }

    /// Whether a call with `arg_count` arguments can bind to this rule
    pub fn accepts_arg_count(&self, arg_count: usize) -> bool {
        if self.variadic {
            arg_count >= self.arity
        } else {
            arg_count == self.arity
        }
    }

    /// Spec of the parameter that argument `index` binds to
    pub fn parameter_for(&self, index: usize) -> Option<&TypeSpec> {
        match self.parameters.get(index) {
            Some(spec) => Some(spec),
            None if self.variadic => self.parameters.last(),
            None => None,
        }
    }

    /// Number of polymorphic parameter positions; fewer is more specific
    pub fn polymorphic_count(&self) -> usize {
        self.parameters.iter().filter(|p| p.is_polymorphic()).count()
    }

    pub fn has_unification(&self) -> bool {
        self.parameters
            .iter()
            .filter_map(TypeSpec::family)
            .any(|family| family.requires_unification())
    }
}

impl fmt::Display for ShippabilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if self.variadic && i + 1 == self.parameters.len() {
                f.write_str("VARIADIC ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ") [{}]", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lakeship_ir::{BuiltinTypeCatalog, PgType, PolyFamily};

    #[test]
    fn test_resolve_rule() {
        let def = func("array_length", 2, &["anyarray", "int4"]).validated(Validator::ArrayDimension);
        let rule = ShippabilityRule::resolve(&def, &BuiltinTypeCatalog).unwrap();

        assert_eq!(
            rule.parameters,
            vec![
                TypeSpec::Polymorphic(PolyFamily::AnyArray),
                TypeSpec::Concrete(PgType::Int4)
            ]
        );
        assert_eq!(rule.polymorphic_count(), 1);
        assert!(!rule.has_unification());
        assert_eq!(rule.to_string(), "array_length(anyarray, int4) [scalar]");
    }

    #[test]
    fn test_arity_must_match_parameters() {
        let def = func("round", 2, &["numeric"]);
        assert!(matches!(
            ShippabilityRule::resolve(&def, &BuiltinTypeCatalog),
            Err(RegistryError::ArityMismatch { arity: 2, params: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let def = agg("sum", 1, &["int16"]);
        assert!(matches!(
            ShippabilityRule::resolve(&def, &BuiltinTypeCatalog),
            Err(RegistryError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_variadic_binding() {
        let def = func("concat_ws", 2, &["text", "any"]).variadic();
        let rule = ShippabilityRule::resolve(&def, &BuiltinTypeCatalog).unwrap();

        assert!(!rule.accepts_arg_count(1));
        assert!(rule.accepts_arg_count(2));
        assert!(rule.accepts_arg_count(5));
        assert_eq!(
            rule.parameter_for(4),
            Some(&TypeSpec::Polymorphic(PolyFamily::Any))
        );
        assert_eq!(rule.to_string(), "concat_ws(text, VARIADIC any) [scalar]");
    }

    #[test]
    fn test_empty_variadic_is_rejected() {
        let def = func("concat", 0, &[]).variadic();
        assert!(matches!(
            ShippabilityRule::resolve(&def, &BuiltinTypeCatalog),
            Err(RegistryError::EmptyVariadic(_))
        ));
    }
}
