//! Built-in functions known to behave identically in both engines
//!
//! Each entry is a claim that this exact call shape produces the same result
//! in DuckDB as in PostgreSQL. Overloads that differ are left out on purpose:
//! `avg(interval)`, `sum(interval)`, three-argument `date_trunc`,
//! `regexp_replace` with integer flags, `array_position`, `array_to_string`
//! and the multi-dimensional array helpers all behave differently.

use crate::rule::{agg, func, window, RuleDef};
use crate::validators::Validator;

pub static BUILTIN_RULES: &[RuleDef] = &[
    // Aggregates
    agg("count", 0, &[]),
    agg("count", 1, &["any"]),
    agg("any_value", 1, &["anyelement"]),

    agg("avg", 1, &["int2"]),
    agg("avg", 1, &["int4"]),
    agg("avg", 1, &["int8"]),
    agg("avg", 1, &["float4"]),
    agg("avg", 1, &["float8"]),
    agg("avg", 1, &["numeric"]),

    agg("sum", 1, &["int2"]),
    agg("sum", 1, &["int4"]),
    agg("sum", 1, &["int8"]),
    agg("sum", 1, &["float4"]),
    agg("sum", 1, &["float8"]),
    agg("sum", 1, &["numeric"]),

    agg("min", 1, &["int2"]),
    agg("min", 1, &["int4"]),
    agg("min", 1, &["int8"]),
    agg("min", 1, &["float4"]),
    agg("min", 1, &["float8"]),
    agg("min", 1, &["numeric"]),
    agg("min", 1, &["text"]),
    agg("min", 1, &["bpchar"]),
    agg("min", 1, &["date"]),
    agg("min", 1, &["timestamp"]),
    agg("min", 1, &["timestamptz"]),
    agg("min", 1, &["time"]),
    agg("min", 1, &["timetz"]),
    agg("min", 1, &["anyenum"]),
    agg("min", 1, &["anyarray"]),

    agg("max", 1, &["int2"]),
    agg("max", 1, &["int4"]),
    agg("max", 1, &["int8"]),
    agg("max", 1, &["float4"]),
    agg("max", 1, &["float8"]),
    agg("max", 1, &["numeric"]),
    agg("max", 1, &["text"]),
    agg("max", 1, &["bpchar"]),
    agg("max", 1, &["date"]),
    agg("max", 1, &["timestamp"]),
    agg("max", 1, &["timestamptz"]),
    agg("max", 1, &["time"]),
    agg("max", 1, &["timetz"]),
    agg("max", 1, &["anyenum"]),
    agg("max", 1, &["anyarray"]),

    agg("stddev", 1, &["int2"]),
    agg("stddev", 1, &["int4"]),
    agg("stddev", 1, &["int8"]),
    agg("stddev", 1, &["float4"]),
    agg("stddev", 1, &["float8"]),
    agg("stddev", 1, &["numeric"]),

    agg("stddev_pop", 1, &["int2"]),
    agg("stddev_pop", 1, &["int4"]),
    agg("stddev_pop", 1, &["int8"]),
    agg("stddev_pop", 1, &["float4"]),
    agg("stddev_pop", 1, &["float8"]),
    agg("stddev_pop", 1, &["numeric"]),

    agg("stddev_samp", 1, &["int2"]),
    agg("stddev_samp", 1, &["int4"]),
    agg("stddev_samp", 1, &["int8"]),
    agg("stddev_samp", 1, &["float4"]),
    agg("stddev_samp", 1, &["float8"]),
    agg("stddev_samp", 1, &["numeric"]),

    agg("variance", 1, &["int2"]),
    agg("variance", 1, &["int4"]),
    agg("variance", 1, &["int8"]),
    agg("variance", 1, &["float4"]),
    agg("variance", 1, &["float8"]),
    agg("variance", 1, &["numeric"]),

    agg("var_samp", 1, &["int2"]),
    agg("var_samp", 1, &["int4"]),
    agg("var_samp", 1, &["int8"]),
    agg("var_samp", 1, &["float4"]),
    agg("var_samp", 1, &["float8"]),
    agg("var_samp", 1, &["numeric"]),

    agg("var_pop", 1, &["int2"]),
    agg("var_pop", 1, &["int4"]),
    agg("var_pop", 1, &["int8"]),
    agg("var_pop", 1, &["float4"]),
    agg("var_pop", 1, &["float8"]),
    agg("var_pop", 1, &["numeric"]),

    // Two-argument statistics
    agg("corr", 2, &["float8", "float8"]),
    agg("covar_pop", 2, &["float8", "float8"]),
    agg("covar_samp", 2, &["float8", "float8"]),
    agg("regr_avgx", 2, &["float8", "float8"]),
    agg("regr_avgy", 2, &["float8", "float8"]),
    agg("regr_count", 2, &["float8", "float8"]),
    agg("regr_intercept", 2, &["float8", "float8"]),
    agg("regr_r2", 2, &["float8", "float8"]),
    agg("regr_slope", 2, &["float8", "float8"]),
    agg("regr_sxx", 2, &["float8", "float8"]),
    agg("regr_sxy", 2, &["float8", "float8"]),
    agg("regr_syy", 2, &["float8", "float8"]),

    // Ordered-set aggregates
    agg("mode", 1, &["anyelement"]),
    agg("percentile_cont", 2, &["float8", "float8"]),
    agg("percentile_disc", 2, &["float8", "anyelement"]),
    agg("percentile_cont", 2, &["_float8", "float8"]),
    agg("percentile_disc", 2, &["_float8", "anyelement"]),

    // Numeric casts
    func("numeric", 1, &["int2"]),
    func("numeric", 1, &["int4"]),
    func("numeric", 1, &["int8"]),
    func("numeric", 1, &["float4"]),
    func("numeric", 1, &["float8"]),
    func("numeric", 2, &["numeric", "int4"]).validated(Validator::CoercionSite),

    func("float8", 1, &["int2"]),
    func("float8", 1, &["int4"]),
    func("float8", 1, &["int8"]),
    func("float8", 1, &["float4"]),
    func("float8", 1, &["numeric"]),

    func("float4", 1, &["int2"]),
    func("float4", 1, &["int4"]),
    func("float4", 1, &["int8"]),
    func("float4", 1, &["float8"]),
    func("float4", 1, &["numeric"]),

    func("int2", 1, &["int4"]),
    func("int2", 1, &["int8"]),
    func("int2", 1, &["float4"]),
    func("int2", 1, &["float8"]),
    func("int2", 1, &["numeric"]),

    func("int4", 1, &["bit"]),
    func("int4", 1, &["int2"]),
    func("int4", 1, &["int8"]),
    func("int4", 1, &["float4"]),
    func("int4", 1, &["float8"]),
    func("int4", 1, &["numeric"]),

    func("int8", 1, &["bit"]),
    func("int8", 1, &["int2"]),
    func("int8", 1, &["int4"]),
    func("int8", 1, &["float4"]),
    func("int8", 1, &["float8"]),
    func("int8", 1, &["numeric"]),

    // Text casts
    func("text", 1, &["bpchar"]),
    func("text", 1, &["char"]),
    func("text", 1, &["bool"]),
    func("char", 1, &["text"]).validated(Validator::CoercionSite),

    // `'abc' || 'd'::char` deparses through the three-argument bpchar()
    func("bpchar", 3, &["bpchar", "int4", "bool"]).validated(Validator::CoercionSite),

    // date, timestamp, timestamptz, time and timetz casts
    func("date", 1, &["timestamp"]),
    func("date", 1, &["timestamptz"]),
    func("timestamp", 1, &["date"]),
    func("timestamp", 1, &["timestamptz"]),
    func("timestamptz", 1, &["date"]),
    func("timestamptz", 1, &["timestamp"]),
    func("time", 1, &["timetz"]),
    func("time", 1, &["timestamp"]),
    func("timetz", 1, &["time"]),
    func("timetz", 1, &["timestamptz"]),

    // Date/time functions
    func("length", 1, &["text"]),
    func("to_date", 1, &["float8"]),
    func("to_timestamp", 1, &["float8"]),
    func("extract", 2, &["text", "date"]),
    func("extract", 2, &["text", "interval"]),
    func("extract", 2, &["text", "timetz"]),
    func("extract", 2, &["text", "time"]),
    func("extract", 2, &["text", "timestamptz"]),
    func("extract", 2, &["text", "timestamp"]),
    func("date_part", 2, &["text", "date"]),
    func("date_part", 2, &["text", "interval"]),
    func("date_part", 2, &["text", "time"]),
    func("date_part", 2, &["text", "timetz"]),
    func("date_part", 2, &["text", "timestamptz"]),
    func("date_part", 2, &["text", "timestamp"]),
    func("date_bin", 3, &["interval", "timestamptz", "timestamptz"]),
    func("date_bin", 3, &["interval", "timestamp", "timestamp"]),
    func("date_trunc", 2, &["text", "interval"]),
    func("date_trunc", 2, &["text", "timestamp"]),
    func("date_trunc", 2, &["text", "timestamptz"]),
    func("now", 0, &[]),
    func("to_char", 2, &["timestamp", "text"]).validated(Validator::ToChar),
    func("to_char", 2, &["timestamptz", "text"]).validated(Validator::ToChar),

    // Strings
    func("regexp_replace", 3, &["text", "text", "text"]),
    func("regexp_replace", 4, &["text", "text", "text", "text"]),
    func("concat", 1, &["any"]).variadic().validated(Validator::ConcatArgs),

    // Booleans
    func("bool", 1, &["int4"]),
    agg("bool_and", 1, &["bool"]),
    agg("bool_or", 1, &["bool"]),

    // Mathematical functions
    func("abs", 1, &["int2"]),
    func("abs", 1, &["int4"]),
    func("abs", 1, &["int8"]),
    func("abs", 1, &["float4"]),
    func("abs", 1, &["float8"]),
    func("abs", 1, &["numeric"]),
    func("cbrt", 1, &["float8"]),
    func("ceil", 1, &["float8"]),
    func("ceil", 1, &["numeric"]),
    func("ceiling", 1, &["float8"]),
    func("ceiling", 1, &["numeric"]),
    func("degrees", 1, &["float8"]),
    // rewritten to fdiv
    func("div", 2, &["numeric", "numeric"]),
    func("exp", 1, &["float8"]),
    func("exp", 1, &["numeric"]),
    func("floor", 1, &["float8"]),
    func("floor", 1, &["numeric"]),
    func("ln", 1, &["float8"]),
    func("ln", 1, &["numeric"]),
    func("log", 1, &["float8"]),
    func("log", 1, &["numeric"]),
    func("log10", 1, &["float8"]),
    func("log10", 1, &["numeric"]),
    // rewritten to fmod
    func("mod", 2, &["numeric", "numeric"]),
    func("pi", 0, &[]),
    func("power", 2, &["float8", "float8"]),
    func("power", 2, &["numeric", "numeric"]),
    func("radians", 1, &["float8"]),
    func("round", 1, &["float8"]),
    func("round", 1, &["numeric"]),
    func("round", 2, &["numeric", "int4"]),
    func("sqrt", 1, &["float8"]),
    func("sqrt", 1, &["numeric"]),
    func("trunc", 1, &["float8"]),
    func("trunc", 1, &["numeric"]),
    func("random", 0, &[]),

    // Trigonometric functions
    func("acos", 1, &["float8"]),
    func("acosd", 1, &["float8"]),
    func("asin", 1, &["float8"]),
    func("asind", 1, &["float8"]),
    func("atan", 1, &["float8"]),
    func("atand", 1, &["float8"]),
    func("atan2", 2, &["float8", "float8"]),
    func("atan2d", 2, &["float8", "float8"]),
    func("cos", 1, &["float8"]),
    func("cosd", 1, &["float8"]),
    func("cot", 1, &["float8"]),
    func("cotd", 1, &["float8"]),
    func("sin", 1, &["float8"]),
    func("sind", 1, &["float8"]),
    func("tan", 1, &["float8"]),
    func("tand", 1, &["float8"]),

    // Array functions
    func("array_append", 2, &["anycompatiblearray", "anycompatible"]),
    func("array_cat", 2, &["anycompatiblearray", "anycompatiblearray"]),
    func("array_length", 2, &["anyarray", "int4"]).validated(Validator::ArrayDimension),
    func("array_prepend", 2, &["anycompatible", "anycompatiblearray"]),
    func("cardinality", 1, &["anyarray"]),
    func("unnest", 1, &["anyarray"]),

    // Array aggregates
    agg("array_agg", 1, &["anyarray"]),
    agg("array_agg", 1, &["anynonarray"]),

    // Window functions
    window("rank", 0, &[]),
    window("row_number", 0, &[]),
    window("dense_rank", 0, &[]),
    window("percent_rank", 0, &[]),
    window("cume_dist", 0, &[]),
    window("ntile", 1, &["int4"]),
    window("lag", 1, &["anyelement"]),
    window("lag", 2, &["anyelement", "int4"]),
    window("lag", 3, &["anycompatible", "int4", "anycompatible"]),
    window("lead", 1, &["anyelement"]),
    window("lead", 2, &["anyelement", "int4"]),
    window("lead", 3, &["anycompatible", "int4", "anycompatible"]),
    window("first_value", 1, &["anyelement"]),
    window("last_value", 1, &["anyelement"]),
    window("nth_value", 2, &["anyelement", "int4"]),

    // Set-returning functions
    func("generate_series", 2, &["int4", "int4"]),
    func("generate_series", 3, &["int4", "int4", "int4"]),
    func("generate_series", 2, &["int8", "int8"]),
    func("generate_series", 3, &["int8", "int8", "int8"]),
    func("generate_series", 3, &["timestamp", "timestamp", "interval"]),
    func("generate_series", 3, &["timestamptz", "timestamptz", "interval"]),

    // Text functions
    func("ascii", 1, &["text"]),
    func("bit_length", 1, &["text"]),
    func("btrim", 1, &["text"]),
    func("btrim", 2, &["text", "text"]),
    func("chr", 1, &["int4"]),
    func("concat_ws", 2, &["text", "any"]).variadic().validated(Validator::ConcatArgs),
    func("left", 2, &["text", "int4"]),
    func("lower", 1, &["text"]),
    func("lpad", 2, &["text", "int4"]),
    func("lpad", 3, &["text", "int4", "text"]),
    func("ltrim", 1, &["text"]),
    func("ltrim", 2, &["text", "text"]),
    func("md5", 1, &["text"]),
    func("position", 2, &["text", "text"]),
    func("regexp_like", 2, &["text", "text"]),
    func("regexp_like", 3, &["text", "text", "text"]),
    func("repeat", 2, &["text", "int4"]),
    func("replace", 3, &["text", "text", "text"]),
    func("reverse", 1, &["text"]),
    func("right", 2, &["text", "int4"]),
    func("rpad", 2, &["text", "int4"]),
    func("rpad", 3, &["text", "int4", "text"]),
    func("rtrim", 1, &["text"]),
    func("rtrim", 2, &["text", "text"]),
    func("split_part", 3, &["text", "text", "int4"]),
    func("starts_with", 2, &["text", "text"]),
    func("strpos", 2, &["text", "text"]),
    func("substr", 2, &["text", "int4"]),
    func("substr", 3, &["text", "int4", "int4"]),
    func("substring", 2, &["text", "int4"]),
    func("substring", 3, &["text", "int4", "int4"]),
    func("upper", 1, &["text"]),

    // JSON
    func("json_array_length", 1, &["json"]),
    func("jsonb_array_length", 1, &["jsonb"]),

    // Binary encodings
    func("encode", 2, &["bytea", "text"]).validated(Validator::EncodingName),
    func("decode", 2, &["text", "text"]).validated(Validator::EncodingName),
];
