//! Rendering compiled templates against a fixed instant
//!
//! Expected strings are what the primary engine's `to_char` produces for
//! 2024-03-05 07:08:09.012345.

use chrono::{NaiveDate, NaiveDateTime};
use lakeship_ir::{CallSite, Const, Expr, PgType};
use lakeship_strftime::{compile, FormatTranslator, Segment, StrftimeTranslator};

fn instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_micro_opt(7, 8, 9, 12_345)
        .unwrap()
}

fn render(format: &str) -> String {
    compile(format).unwrap().render(&instant()).unwrap()
}

#[test]
fn test_render_numeric_fields() {
    assert_eq!(render("YYYY-MM-DD"), "2024-03-05");
    assert_eq!(render("HH24:MI:SS"), "07:08:09");
    assert_eq!(render("HH12 AM"), "07 AM");
    assert_eq!(render("YY DDD"), "24 065");
}

#[test]
fn test_render_fractional_seconds() {
    assert_eq!(render("SS.MS"), "09.012");
    assert_eq!(render("SS.US"), "09.012345");
}

#[test]
fn test_render_fill_mode() {
    assert_eq!(render("FMDD/FMMM FMHH24:FMMI"), "5/3 7:8");
    assert_eq!(render("FMDay, FMMonth FMDD"), "Tuesday, March 5");
}

#[test]
fn test_render_case_variants() {
    assert_eq!(render("DD MON YYYY"), "05 MAR 2024");
    assert_eq!(render("dy mon"), "tue mar");
    assert_eq!(render("FMDAY"), "TUESDAY");
    assert_eq!(render("HH12 pm"), "07 am");
}

#[test]
fn test_render_quarter_and_iso_fields() {
    assert_eq!(render("YYYY\"Q\"Q"), "2024Q1");
    assert_eq!(render("IYYY-IW-ID"), "2024-10-2");
}

#[test]
fn test_render_literals() {
    assert_eq!(render("\"Year\" YYYY, 100%"), "Year 2024, 100%");
}

#[test]
fn test_rewrite_clones_argument_into_each_segment() {
    let chain = StrftimeTranslator.try_compile("DD MON").unwrap();
    let arg = Expr::column("created_at", PgType::Timestamp);

    let expr = chain.to_expr(&arg);
    let Expr::Call(concat) = expr else {
        panic!("expected a call, got {:?}", expr);
    };
    assert_eq!(concat.name, "concat");
    assert_eq!(concat.args.len(), 2);

    let Expr::Call(upper) = &concat.args[1] else {
        panic!("expected upper(...)");
    };
    assert_eq!(upper.name, "upper");
    let Expr::Call(strftime) = &upper.args[0] else {
        panic!("expected strftime(...)");
    };
    assert_eq!(strftime.args[0], arg);
    assert_eq!(strftime.args[1], Expr::Const(Const::text("%b")));
}

#[test]
fn test_single_segment_rewrite_is_plain_strftime() {
    let chain = compile("YYYY").unwrap();
    let arg = Expr::column("ts", PgType::Timestamp);
    let expected = Expr::call(CallSite::scalar(
        "strftime",
        vec![arg.clone(), Expr::Const(Const::text("%Y"))],
        PgType::Text,
    ));

    assert_eq!(chain.to_expr(&arg), expected);
    assert_eq!(chain.to_sql("ts"), "strftime(ts, '%Y')");
    assert_eq!(chain.segments(), &[Segment::Strftime("%Y".to_string())]);
}

#[test]
fn test_chain_serializes_segments() {
    let chain = compile("Q").unwrap();
    let json = serde_json::to_string(&chain).unwrap();
    assert_eq!(json, r#"{"segments":[{"segment":"quarter"}]}"#);
}
