//! Call-site validators
//!
//! A matching signature is necessary but not sufficient: these predicates
//! re-examine the actual call expression. They never fail; a precondition that
//! does not hold (a non-constant where a constant is needed, a null constant)
//! is simply "not shippable".

use lakeship_ir::{CallSite, Const, PgType};
use lakeship_strftime::FormatTranslator;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Every argument renders to identical text in both engines
    ConcatArgs,
    /// Second argument is the constant `'base64'` or `'hex'`
    EncodingName,
    /// Second argument is the constant dimension `1`
    ArrayDimension,
    /// The call was inserted for a type coercion, not written as a call
    CoercionSite,
    /// The `to_char` format is a constant the translator fully supports
    ToChar,
}

impl Validator {
    pub fn name(&self) -> &'static str {
        match self {
            Validator::ConcatArgs => "concat_args",
            Validator::EncodingName => "encoding_name",
            Validator::ArrayDimension => "array_dimension",
            Validator::CoercionSite => "coercion_site",
            Validator::ToChar => "to_char",
        }
    }

    pub fn check(&self, call: &CallSite, translator: &dyn FormatTranslator) -> bool {
        match self {
            Validator::ConcatArgs => concat_args_render_alike(call),
            Validator::EncodingName => encoding_is_supported(call),
            Validator::ArrayDimension => is_first_dimension(call),
            Validator::CoercionSite => call.coercion.is_cast(),
            Validator::ToChar => to_char_is_convertible(call, translator),
        }
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Types whose text form is the same in both engines. Booleans (`t` vs
/// `true`), arrays and most others differ.
fn renders_alike(ty: &PgType) -> bool {
    matches!(
        ty,
        PgType::Unknown
            | PgType::Text
            | PgType::Varchar
            | PgType::Bpchar
            | PgType::Char
            | PgType::Int2
            | PgType::Int4
            | PgType::Int8
            | PgType::Float4
            | PgType::Float8
            | PgType::Numeric
            | PgType::Uuid
    )
}

fn concat_args_render_alike(call: &CallSite) -> bool {
    call.args.iter().all(|arg| renders_alike(arg.data_type()))
}

fn encoding_is_supported(call: &CallSite) -> bool {
    call.const_arg(1)
        .and_then(Const::as_text)
        .is_some_and(|format| {
            format.eq_ignore_ascii_case("base64") || format.eq_ignore_ascii_case("hex")
        })
}

fn is_first_dimension(call: &CallSite) -> bool {
    call.const_arg(1).and_then(Const::as_int4) == Some(1)
}

fn to_char_is_convertible(call: &CallSite, translator: &dyn FormatTranslator) -> bool {
    // The rewrite clones the timestamp argument into every segment
    if call.contains_volatile() {
        return false;
    }

    match call.const_arg(1).and_then(Const::as_text) {
        Some(format) => translator.is_convertible(format),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lakeship_ir::{CoercionForm, Expr, Value, Volatility};
    use lakeship_strftime::StrftimeTranslator;

    fn check(validator: Validator, call: &CallSite) -> bool {
        validator.check(call, &StrftimeTranslator)
    }

    fn encode(format: Expr) -> CallSite {
        CallSite::scalar(
            "encode",
            vec![Expr::column("data", PgType::Bytea), format],
            PgType::Text,
        )
    }

    #[test]
    fn test_concat_whitelist() {
        let ok = CallSite::scalar(
            "concat",
            vec![
                Expr::Const(Const::text("a")),
                Expr::Const(Const::int4(1)),
                Expr::constant(PgType::Unknown, Value::String("b".to_string())),
                Expr::column("id", PgType::Uuid),
            ],
            PgType::Text,
        );
        assert!(check(Validator::ConcatArgs, &ok));

        for ty in [PgType::Bool, PgType::array_of(PgType::Int4), PgType::Date, PgType::Jsonb] {
            let call = CallSite::scalar(
                "concat",
                vec![Expr::Const(Const::text("a")), Expr::column("c", ty)],
                PgType::Text,
            );
            assert!(!check(Validator::ConcatArgs, &call), "{:?}", call.args[1]);
        }
    }

    #[test]
    fn test_encoding_name_is_case_insensitive() {
        assert!(check(Validator::EncodingName, &encode(Expr::Const(Const::text("HEX")))));
        assert!(check(Validator::EncodingName, &encode(Expr::Const(Const::text("Base64")))));
        assert!(!check(Validator::EncodingName, &encode(Expr::Const(Const::text("escape")))));
    }

    #[test]
    fn test_encoding_name_requires_non_null_text_constant() {
        assert!(!check(Validator::EncodingName, &encode(Expr::Const(Const::null(PgType::Text)))));
        assert!(!check(
            Validator::EncodingName,
            &encode(Expr::constant(PgType::Unknown, Value::String("hex".to_string())))
        ));
        assert!(!check(Validator::EncodingName, &encode(Expr::column("fmt", PgType::Text))));

        let missing = CallSite::scalar("encode", vec![Expr::column("data", PgType::Bytea)], PgType::Text);
        assert!(!check(Validator::EncodingName, &missing));
    }

    #[test]
    fn test_array_dimension() {
        let call = |dim: Expr| {
            CallSite::scalar(
                "array_length",
                vec![Expr::column("arr", PgType::array_of(PgType::Int4)), dim],
                PgType::Int4,
            )
        };
        assert!(check(Validator::ArrayDimension, &call(Expr::Const(Const::int4(1)))));
        assert!(!check(Validator::ArrayDimension, &call(Expr::Const(Const::int4(2)))));
        assert!(!check(Validator::ArrayDimension, &call(Expr::Const(Const::null(PgType::Int4)))));
        assert!(!check(
            Validator::ArrayDimension,
            &call(Expr::Param { index: 1, ty: PgType::Int4 })
        ));
    }

    #[test]
    fn test_coercion_site_polarity() {
        let call = CallSite::scalar(
            "numeric",
            vec![Expr::column("n", PgType::Numeric), Expr::Const(Const::int4(655366))],
            PgType::Numeric,
        );
        assert!(!check(Validator::CoercionSite, &call));
        assert!(check(
            Validator::CoercionSite,
            &call.clone().with_coercion(CoercionForm::ImplicitCast)
        ));
        assert!(check(
            Validator::CoercionSite,
            &call.with_coercion(CoercionForm::ExplicitCast)
        ));
    }

    #[test]
    fn test_to_char_rejects_volatile_argument() {
        let random_ts = CallSite::scalar("random_ts", vec![], PgType::Timestamp)
            .with_volatility(Volatility::Volatile);
        let call = CallSite::scalar(
            "to_char",
            vec![Expr::call(random_ts), Expr::Const(Const::text("YYYY"))],
            PgType::Text,
        );
        assert!(!check(Validator::ToChar, &call));
    }

    #[test]
    fn test_to_char_requires_constant_format() {
        let call = CallSite::scalar(
            "to_char",
            vec![
                Expr::column("ts", PgType::Timestamp),
                Expr::column("fmt", PgType::Text),
            ],
            PgType::Text,
        );
        assert!(!check(Validator::ToChar, &call));
    }
}
