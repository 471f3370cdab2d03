//! Shippability registry and matcher
//!
//! Decides whether a built-in function call in a PostgreSQL plan may be
//! evaluated by DuckDB instead. The registry is a fixed table of call shapes
//! known to produce identical results in both engines; a call is shippable
//! when its most specific matching rule accepts it.

use lakeship_ir::{CallSite, TypeError};
use thiserror::Error;

mod builtins;
mod matcher;
mod registry;
mod rule;
mod validators;

pub use builtins::BUILTIN_RULES;
pub use matcher::{Matcher, Verdict};
pub use registry::Registry;
pub use rule::{agg, func, window, RuleDef, ShippabilityRule};
pub use validators::Validator;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate rule: {0}")]
    DuplicateRule(String),

    #[error("Rule {rule} declares arity {arity} but lists {params} parameter types")]
    ArityMismatch {
        rule: String,
        arity: usize,
        params: usize,
    },

    #[error("Rule {rule} has an invalid parameter type")]
    UnknownType {
        rule: String,
        #[source]
        source: TypeError,
    },

    #[error("Variadic rule {0} has no parameter to repeat")]
    EmptyVariadic(String),
}

/// Whether `call` may be evaluated by the secondary engine
pub fn is_shippable(call: &CallSite) -> bool {
    Matcher::builtin().is_shippable(call)
}

/// Shippability verdict for `call`, with the reason when negative
pub fn explain(call: &CallSite) -> Verdict {
    Matcher::builtin().explain(call)
}

/// Every built-in rule, in registration order
pub fn all_rules() -> &'static [ShippabilityRule] {
    Registry::builtin().rules()
}
