//! Text and JSON rendering of command results

use chrono::NaiveDateTime;
use lakeship_ir::{CallSite, FunctionKind};
use lakeship_registry::{Matcher, ShippabilityRule, Verdict};
use lakeship_strftime::{FormatError, Segment, StrftimeChain};
use serde::Serialize;

use crate::config::ReportFormat;

/// Fixed instant used to preview a compiled template
pub fn preview_instant() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|date| date.and_hms_micro_opt(7, 8, 9, 12_345))
        .expect("preview instant is a valid date")
}

/// Rules filtered for the `rules` command
pub fn select_rules<'a>(
    rules: &'a [ShippabilityRule],
    kind: Option<FunctionKind>,
    name: Option<&str>,
) -> Vec<&'a ShippabilityRule> {
    rules
        .iter()
        .filter(|rule| kind.map_or(true, |kind| rule.kind == kind))
        .filter(|rule| name.map_or(true, |name| rule.name.eq_ignore_ascii_case(name)))
        .collect()
}

pub fn rules(rules: &[&ShippabilityRule], format: ReportFormat) -> serde_json::Result<String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(rules),
        ReportFormat::Text => {
            let width = rules
                .iter()
                .map(|rule| rule.to_string().len())
                .max()
                .unwrap_or(0)
                .max("SIGNATURE".len());

            let mut out = format!("{:<width$}  VALIDATOR\n", "SIGNATURE");
            for rule in rules {
                let validator = rule.validator.map(|v| v.name()).unwrap_or("-");
                out.push_str(&format!("{:<width$}  {}\n", rule.to_string(), validator));
            }
            out.push_str(&format!("{} rules", rules.len()));
            Ok(out)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub function: String,
    pub kind: FunctionKind,
    pub arity: usize,
    pub fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    pub shippable: bool,
    #[serde(flatten)]
    pub verdict: Verdict,
}

impl CheckReport {
    pub fn new(matcher: &Matcher<'_>, call: &CallSite) -> Self {
        let verdict = matcher.explain(call);
        Self {
            function: call.name.clone(),
            kind: call.kind,
            arity: call.arity(),
            fingerprint: call.fingerprint(),
            rule: matcher.find_rule(call).map(ToString::to_string),
            shippable: verdict.is_shippable(),
            verdict,
        }
    }

    pub fn render(&self, format: ReportFormat) -> serde_json::Result<String> {
        match format {
            ReportFormat::Json => serde_json::to_string_pretty(self),
            ReportFormat::Text => {
                let mut out = format!(
                    "call:        {}/{} [{}]\nfingerprint: {}\n",
                    self.function, self.arity, self.kind, self.fingerprint
                );
                if let Some(rule) = &self.rule {
                    out.push_str(&format!("rule:        {}\n", rule));
                }
                out.push_str(&format!("verdict:     {}", self.verdict));
                Ok(out)
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FormatReport {
    pub template: String,
    pub sql: String,
    pub segments: Vec<Segment>,
    pub preview: String,
}

impl FormatReport {
    /// Render a compiled chain at [`preview_instant`]
    pub fn new(template: &str, chain: &StrftimeChain) -> Result<Self, FormatError> {
        Ok(Self {
            template: template.to_string(),
            sql: chain.to_sql("ts"),
            segments: chain.segments().to_vec(),
            preview: chain.render(&preview_instant())?,
        })
    }

    pub fn render(&self, format: ReportFormat) -> serde_json::Result<String> {
        match format {
            ReportFormat::Json => serde_json::to_string_pretty(self),
            ReportFormat::Text => Ok(format!(
                "to_char:  {}\nduckdb:   {}\npreview:  {}  ({})",
                self.template,
                self.sql,
                self.preview,
                preview_instant().format("%Y-%m-%d %H:%M:%S%.6f")
            )),
        }
    }
}
