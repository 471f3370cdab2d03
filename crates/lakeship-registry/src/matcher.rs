//! Signature matching and the final shippability verdict

use lakeship_ir::{BuiltinTypeCatalog, CallSite, PgType, PolyFamily, TypeCatalog, TypeSpec};
use lakeship_strftime::{FormatTranslator, StrftimeTranslator};
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

use crate::registry::Registry;
use crate::rule::ShippabilityRule;
use crate::validators::Validator;

/// Outcome of a shippability check, with the reason when it is negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Shippable,
    /// No rule with this name, kind and argument count
    UnknownFunction,
    /// Rules exist, but none accepts the argument types
    NoMatchingSignature,
    /// The matched rule's validator rejected the call site
    Rejected { validator: Validator },
}

impl Verdict {
    pub fn is_shippable(&self) -> bool {
        matches!(self, Verdict::Shippable)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Shippable => f.write_str("shippable"),
            Verdict::UnknownFunction => f.write_str("not shippable: unknown function"),
            Verdict::NoMatchingSignature => f.write_str("not shippable: no matching signature"),
            Verdict::Rejected { validator } => {
                write!(f, "not shippable: rejected by {}", validator)
            }
        }
    }
}

/// Matches call sites against a registry.
///
/// Holds only shared references, so a single matcher can serve any number
/// of concurrent checks.
#[derive(Clone, Copy)]
pub struct Matcher<'a> {
    registry: &'a Registry,
    catalog: &'a dyn TypeCatalog,
    translator: &'a dyn FormatTranslator,
}

impl<'a> Matcher<'a> {
    pub fn new(
        registry: &'a Registry,
        catalog: &'a dyn TypeCatalog,
        translator: &'a dyn FormatTranslator,
    ) -> Self {
        Self {
            registry,
            catalog,
            translator,
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Most specific rule whose signature accepts the call, ignoring
    /// validators
    pub fn find_rule(&self, call: &CallSite) -> Option<&'a ShippabilityRule> {
        self.select(call).ok()
    }

    fn select(&self, call: &CallSite) -> Result<&'a ShippabilityRule, Verdict> {
        let candidates = self.registry.candidates(&call.name, call.kind, call.arity());
        if candidates.is_empty() {
            return Err(Verdict::UnknownFunction);
        }

        let arg_types = call.arg_types();
        candidates
            .into_iter()
            .filter(|rule| {
                let compatible = self.is_compatible(rule, &arg_types);
                trace!(rule = %rule, compatible, "candidate");
                compatible
            })
            .min_by_key(|rule| rule.polymorphic_count())
            .ok_or(Verdict::NoMatchingSignature)
    }

    fn is_compatible(&self, rule: &ShippabilityRule, arg_types: &[&PgType]) -> bool {
        let positions_match = arg_types.iter().enumerate().all(|(i, actual)| {
            match rule.parameter_for(i) {
                Some(TypeSpec::Concrete(expected)) => expected == *actual,
                Some(TypeSpec::Polymorphic(family)) => self.catalog.is_member(actual, *family),
                None => false,
            }
        });

        positions_match && (!rule.has_unification() || self.unifies(rule, arg_types))
    }

    /// `anycompatible` arguments and `anycompatiblearray` elements must share
    /// a common type
    fn unifies(&self, rule: &ShippabilityRule, arg_types: &[&PgType]) -> bool {
        let mut group: Vec<&PgType> = Vec::new();
        for (i, actual) in arg_types.iter().enumerate() {
            match rule.parameter_for(i).and_then(TypeSpec::family) {
                Some(PolyFamily::AnyCompatible) => group.push(*actual),
                Some(PolyFamily::AnyCompatibleArray) => match actual.element_type() {
                    Some(element) => group.push(element),
                    None => return false,
                },
                _ => {}
            }
        }
        self.catalog.common_type(&group).is_some()
    }

    /// Verdict with its reason
    pub fn explain(&self, call: &CallSite) -> Verdict {
        let verdict = match self.select(call) {
            Err(verdict) => verdict,
            Ok(rule) => match rule.validator {
                Some(validator) if !validator.check(call, self.translator) => {
                    Verdict::Rejected { validator }
                }
                _ => Verdict::Shippable,
            },
        };

        debug!(
            function = %call.name,
            kind = %call.kind,
            arity = call.arity(),
            verdict = %verdict,
            "shippability decided"
        );
        verdict
    }

    pub fn is_shippable(&self, call: &CallSite) -> bool {
        self.explain(call).is_shippable()
    }
}

impl Matcher<'static> {
    /// Matcher over the built-in registry, catalog and translator
    pub fn builtin() -> Self {
        Self::new(Registry::builtin(), &BuiltinTypeCatalog, &StrftimeTranslator)
    }
}

impl Default for Matcher<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Matcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("rules", &self.registry.len())
            .finish_non_exhaustive()
    }
}
