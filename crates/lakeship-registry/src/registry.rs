//! Immutable registry of shippability rules

use lakeship_ir::{BuiltinTypeCatalog, FunctionKind, TypeCatalog, TypeSpec};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::info;

use crate::builtins::BUILTIN_RULES;
use crate::rule::{RuleDef, ShippabilityRule};
use crate::RegistryError;

static BUILTIN: LazyLock<Registry> = LazyLock::new(|| match Registry::try_builtin() {
    Ok(registry) => registry,
    Err(err) => panic!("built-in shippability table is malformed: {}", err),
});

/// Ordered collection of rules, indexed by function name.
///
/// Built once and read-only afterwards; shared across threads without
/// locking.
#[derive(Debug)]
pub struct Registry {
    rules: Vec<ShippabilityRule>,
    by_name: HashMap<String, Vec<usize>>,
}

impl Registry {
    /// Resolve and index `defs`, rejecting malformed or duplicate rules
    pub fn build(defs: &[RuleDef], catalog: &dyn TypeCatalog) -> Result<Self, RegistryError> {
        let mut rules = Vec::with_capacity(defs.len());
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        let mut seen: HashSet<(String, FunctionKind, Vec<TypeSpec>)> = HashSet::new();

        for def in defs {
            let rule = ShippabilityRule::resolve(def, catalog)?;

            if !seen.insert((rule.name.clone(), rule.kind, rule.parameters.clone())) {
                return Err(RegistryError::DuplicateRule(rule.to_string()));
            }

            by_name
                .entry(rule.name.clone())
                .or_insert_with(Vec::new)
                .push(rules.len());
            rules.push(rule);
        }

        info!(
            rules = rules.len(),
            functions = by_name.len(),
            "shippability registry built"
        );

        Ok(Self { rules, by_name })
    }

    /// Build the built-in table against the built-in type catalog
    pub fn try_builtin() -> Result<Self, RegistryError> {
        Self::build(BUILTIN_RULES, &BuiltinTypeCatalog)
    }

    /// Process-wide built-in registry
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    fn named(&self, name: &str) -> impl Iterator<Item = &ShippabilityRule> {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(|&index| &self.rules[index])
    }

    /// Rules declared with exactly this name, kind and arity, in
    /// registration order
    pub fn lookup(&self, name: &str, kind: FunctionKind, arity: usize) -> Vec<&ShippabilityRule> {
        self.named(name)
            .filter(|rule| rule.kind == kind && rule.arity == arity)
            .collect()
    }

    /// Rules a call with `arg_count` arguments can bind to, including
    /// variadic rules, in registration order
    pub fn candidates(&self, name: &str, kind: FunctionKind, arg_count: usize) -> Vec<&ShippabilityRule> {
        self.named(name)
            .filter(|rule| rule.kind == kind && rule.accepts_arg_count(arg_count))
            .collect()
    }

    pub fn rules(&self) -> &[ShippabilityRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
