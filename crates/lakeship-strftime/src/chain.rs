//! Compiled `to_char` templates

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, NaiveDateTime};
use lakeship_ir::{CallSite, Const, Expr, PgType};
use serde::{Deserialize, Serialize};

use crate::FormatError;

/// One piece of the DuckDB expression chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "segment", content = "format", rename_all = "snake_case")]
pub enum Segment {
    /// `strftime(x, format)`
    Strftime(String),
    /// `upper(strftime(x, format))`
    Upper(String),
    /// `lower(strftime(x, format))`
    Lower(String),
    /// `quarter(x)`
    Quarter,
}

impl Segment {
    fn to_expr(&self, arg: &Expr) -> Expr {
        let strftime = |format: &str| {
            Expr::call(CallSite::scalar(
                "strftime",
                vec![arg.clone(), Expr::Const(Const::text(format))],
                PgType::Text,
            ))
        };
        match self {
            Segment::Strftime(format) => strftime(format),
            Segment::Upper(format) => {
                Expr::call(CallSite::scalar("upper", vec![strftime(format)], PgType::Text))
            }
            Segment::Lower(format) => {
                Expr::call(CallSite::scalar("lower", vec![strftime(format)], PgType::Text))
            }
            Segment::Quarter => {
                Expr::call(CallSite::scalar("quarter", vec![arg.clone()], PgType::Int8))
            }
        }
    }

    fn to_sql(&self, arg_sql: &str) -> String {
        match self {
            Segment::Strftime(format) => format!("strftime({}, {})", arg_sql, quote(format)),
            Segment::Upper(format) => format!("upper(strftime({}, {}))", arg_sql, quote(format)),
            Segment::Lower(format) => format!("lower(strftime({}, {}))", arg_sql, quote(format)),
            Segment::Quarter => format!("quarter({})", arg_sql),
        }
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Ordered DuckDB segments whose concatenation equals the `to_char` output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrftimeChain {
    segments: Vec<Segment>,
}

impl StrftimeChain {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append literal text, escaped for `strftime`. Literals never join an
    /// upper/lower segment, which would change their case.
    pub(crate) fn push_literal(&mut self, text: &str) {
        let escaped = text.replace('%', "%%");
        match self.segments.last_mut() {
            Some(Segment::Strftime(format)) => format.push_str(&escaped),
            _ => self.segments.push(Segment::Strftime(escaped)),
        }
    }

    /// Append a directive; adjacent segments of the same shape share one call
    pub(crate) fn push(&mut self, segment: Segment) {
        if let Some(last) = self.segments.last_mut() {
            match (last, &segment) {
                (Segment::Strftime(prev), Segment::Strftime(next))
                | (Segment::Upper(prev), Segment::Upper(next))
                | (Segment::Lower(prev), Segment::Lower(next)) => {
                    prev.push_str(next);
                    return;
                }
                _ => {}
            }
        }
        self.segments.push(segment);
    }

    /// Build the DuckDB expression over `arg`.
    ///
    /// `arg` is cloned into every segment, so it is evaluated once per
    /// segment.
    pub fn to_expr(&self, arg: &Expr) -> Expr {
        match self.segments.as_slice() {
            [single] => single.to_expr(arg),
            segments => Expr::call(CallSite::scalar(
                "concat",
                segments.iter().map(|s| s.to_expr(arg)).collect(),
                PgType::Text,
            )),
        }
    }

    /// DuckDB SQL text over an already-deparsed argument
    pub fn to_sql(&self, arg_sql: &str) -> String {
        match self.segments.as_slice() {
            [single] => single.to_sql(arg_sql),
            segments => {
                let parts: Vec<String> = segments.iter().map(|s| s.to_sql(arg_sql)).collect();
                format!("concat({})", parts.join(", "))
            }
        }
    }

    /// Evaluate the chain locally, the way DuckDB would.
    pub fn render(&self, ts: &NaiveDateTime) -> Result<String, FormatError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Strftime(format) => out.push_str(&strftime(ts, format)?),
                Segment::Upper(format) => out.push_str(&strftime(ts, format)?.to_uppercase()),
                Segment::Lower(format) => out.push_str(&strftime(ts, format)?.to_lowercase()),
                Segment::Quarter => out.push_str(&((ts.month0() / 3) + 1).to_string()),
            }
        }
        Ok(out)
    }
}

/// DuckDB-only specifiers spelled the way chrono understands them
fn to_chrono_format(format: &str) -> String {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('g') => out.push_str("%3f"),
            Some('f') => out.push_str("%6f"),
            Some(next) => {
                out.push('%');
                out.push(next);
            }
            None => out.push('%'),
        }
    }
    out
}

fn strftime(ts: &NaiveDateTime, format: &str) -> Result<String, FormatError> {
    let format = to_chrono_format(format);
    let items: Vec<Item<'_>> = StrftimeItems::new(&format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(FormatError::Render(format.clone()));
    }
    Ok(ts.format_with_items(items.into_iter()).to_string())
}
