//! Call-site IR for shippability analysis
//!
//! Read-only view of one function or operator invocation in a query plan,
//! as produced upstream by plan analysis. All types serialize to a canonical
//! JSON form so call sites can be captured, replayed and fingerprinted.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

mod catalog;
mod types;

pub use catalog::{BuiltinTypeCatalog, TypeCatalog};
pub use types::*;

/// Namespace of functions a call resolves into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Scalar,
    Aggregate,
    Window,
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FunctionKind::Scalar => "scalar",
            FunctionKind::Aggregate => "aggregate",
            FunctionKind::Window => "window",
        };
        f.write_str(name)
    }
}

/// How a call appeared in the query text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionForm {
    /// Written as a function call
    #[default]
    Call,
    /// Inserted by the planner for an implicit coercion
    ImplicitCast,
    /// Written as `CAST(x AS t)` or `x::t`
    ExplicitCast,
}

impl CoercionForm {
    pub fn is_cast(&self) -> bool {
        matches!(self, CoercionForm::ImplicitCast | CoercionForm::ExplicitCast)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Volatility {
    #[default]
    Immutable,
    Stable,
    Volatile,
}

/// Constant datum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Const {
    pub ty: PgType,
    #[serde(default = "null_value")]
    pub value: Value,
}

fn null_value() -> Value {
    Value::Null
}

impl Const {
    pub fn new(ty: PgType, value: Value) -> Self {
        Self { ty, value }
    }

    pub fn null(ty: PgType) -> Self {
        Self { ty, value: Value::Null }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(PgType::Text, Value::String(value.into()))
    }

    pub fn int4(value: i32) -> Self {
        Self::new(PgType::Int4, Value::Int(value.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    /// Text value of a non-null text constant
    pub fn as_text(&self) -> Option<&str> {
        match (&self.ty, &self.value) {
            (PgType::Text, Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Integer value of a non-null int4 constant
    pub fn as_int4(&self) -> Option<i32> {
        match (&self.ty, &self.value) {
            (PgType::Int4, Value::Int(v)) => i32::try_from(*v).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub column: String,
    pub ty: PgType,
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    Const(Const),
    Column(ColumnRef),
    /// External parameter (`$1`), value unknown at planning time
    Param { index: u32, ty: PgType },
    Call(Box<CallSite>),
    /// Operator invocation, e.g. `a + b`
    Op {
        op: String,
        args: Vec<Expr>,
        ty: PgType,
        #[serde(default)]
        volatility: Volatility,
    },
    /// Binary-compatible coercion that changes only the static type
    Relabel { arg: Box<Expr>, ty: PgType },
}

impl Expr {
    pub fn constant(ty: PgType, value: Value) -> Self {
        Expr::Const(Const::new(ty, value))
    }

    pub fn column(name: impl Into<String>, ty: PgType) -> Self {
        Expr::Column(ColumnRef {
            table: None,
            column: name.into(),
            ty,
        })
    }

    pub fn call(call: CallSite) -> Self {
        Expr::Call(Box::new(call))
    }

    /// Static type of the expression
    pub fn data_type(&self) -> &PgType {
        match self {
            Expr::Const(c) => &c.ty,
            Expr::Column(col) => &col.ty,
            Expr::Param { ty, .. } => ty,
            Expr::Call(call) => &call.return_type,
            Expr::Op { ty, .. } => ty,
            Expr::Relabel { ty, .. } => ty,
        }
    }

    pub fn as_const(&self) -> Option<&Const> {
        match self {
            Expr::Const(c) => Some(c),
            _ => None,
        }
    }

    /// Whether evaluating this expression may involve a volatile function
    pub fn contains_volatile(&self) -> bool {
        match self {
            Expr::Const(_) | Expr::Column(_) | Expr::Param { .. } => false,
            Expr::Call(call) => call.contains_volatile(),
            Expr::Op { args, volatility, .. } => {
                *volatility == Volatility::Volatile || args.iter().any(Expr::contains_volatile)
            }
            Expr::Relabel { arg, .. } => arg.contains_volatile(),
        }
    }
}

/// One function invocation as seen by the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSite {
    pub name: String,
    pub kind: FunctionKind,
    #[serde(default)]
    pub args: Vec<Expr>,
    pub return_type: PgType,
    #[serde(default)]
    pub coercion: CoercionForm,
    #[serde(default)]
    pub volatility: Volatility,
}

impl CallSite {
    pub fn new(
        name: impl Into<String>,
        kind: FunctionKind,
        args: Vec<Expr>,
        return_type: PgType,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            args,
            return_type,
            coercion: CoercionForm::Call,
            volatility: Volatility::Immutable,
        }
    }

    pub fn scalar(name: impl Into<String>, args: Vec<Expr>, return_type: PgType) -> Self {
        Self::new(name, FunctionKind::Scalar, args, return_type)
    }

    pub fn with_coercion(mut self, coercion: CoercionForm) -> Self {
        self.coercion = coercion;
        self
    }

    pub fn with_volatility(mut self, volatility: Volatility) -> Self {
        self.volatility = volatility;
        self
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn arg_types(&self) -> Vec<&PgType> {
        self.args.iter().map(Expr::data_type).collect()
    }

    /// Constant argument at `index`, if that argument is a constant at all
    pub fn const_arg(&self, index: usize) -> Option<&Const> {
        self.args.get(index).and_then(Expr::as_const)
    }

    /// Whether this call or any of its sub-expressions is volatile
    pub fn contains_volatile(&self) -> bool {
        self.volatility == Volatility::Volatile || self.args.iter().any(Expr::contains_volatile)
    }

    /// Calculate fingerprint (SHA-256) of the canonical JSON form
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("call site should always serialize");
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now_call() -> CallSite {
        CallSite::scalar("now", vec![], PgType::TimestampTz).with_volatility(Volatility::Volatile)
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let call = CallSite::scalar(
            "lower",
            vec![Expr::column("name", PgType::Text)],
            PgType::Text,
        );
        let copy = call.clone();

        assert_eq!(call.fingerprint(), copy.fingerprint());
        assert_ne!(call.fingerprint(), now_call().fingerprint());
    }

    #[test]
    fn test_volatility_is_found_in_nested_arguments() {
        let to_char = CallSite::scalar(
            "to_char",
            vec![
                Expr::call(now_call()),
                Expr::Const(Const::text("YYYY")),
            ],
            PgType::Text,
        )
        .with_volatility(Volatility::Stable);

        assert!(to_char.contains_volatile());

        let relabeled = Expr::Relabel {
            arg: Box::new(Expr::call(now_call())),
            ty: PgType::Timestamp,
        };
        assert!(relabeled.contains_volatile());
        assert!(!Expr::column("ts", PgType::Timestamp).contains_volatile());
    }

    #[test]
    fn test_const_accessors() {
        assert_eq!(Const::text("hex").as_text(), Some("hex"));
        assert_eq!(Const::null(PgType::Text).as_text(), None);
        assert_eq!(Const::int4(1).as_int4(), Some(1));
        assert_eq!(Const::new(PgType::Int8, Value::Int(1)).as_int4(), None);
    }

    #[test]
    fn test_json_round_trip() {
        let call = CallSite::scalar(
            "encode",
            vec![
                Expr::column("data", PgType::Bytea),
                Expr::Const(Const::text("base64")),
            ],
            PgType::Text,
        );

        let json = serde_json::to_string(&call).unwrap();
        let parsed: CallSite = serde_json::from_str(&json).unwrap();

        assert_eq!(call, parsed);
        assert_eq!(call.fingerprint(), parsed.fingerprint());
    }

    #[test]
    fn test_call_site_from_json_defaults() {
        let json = r#"{
            "name": "array_length",
            "kind": "scalar",
            "return_type": "int4",
            "args": [
                {"type": "Column", "column": "tags", "ty": "_text"},
                {"type": "Const", "ty": "int4", "value": 1}
            ]
        }"#;

        let call: CallSite = serde_json::from_str(json).unwrap();
        assert_eq!(call.coercion, CoercionForm::Call);
        assert_eq!(call.volatility, Volatility::Immutable);
        assert_eq!(call.arg_types(), vec![&PgType::array_of(PgType::Text), &PgType::Int4]);
        assert_eq!(call.const_arg(1).and_then(Const::as_int4), Some(1));
    }
}
