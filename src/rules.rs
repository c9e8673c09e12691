//! Lint rules applied to the descriptor catalog.
//!
//! Each rule is a named check over one descriptor. The registry is plain
//! data built once (`RuleSet::standard`) and narrowed by a disable set.

use crate::error::ConfigError;
use crate::models::{Issue, MetricDescriptor, MetricType};
use regex::Regex;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LintRule {
    Help,
    MetricUnits,
    Counter,
    HistogramSummaryReserved,
    MetricTypeInName,
    ReservedChars,
    CamelCase,
    UnitAbbreviations,
}

impl LintRule {
    /// All rules in application order.
    pub const ALL: [LintRule; 8] = [
        LintRule::Help,
        LintRule::MetricUnits,
        LintRule::Counter,
        LintRule::HistogramSummaryReserved,
        LintRule::MetricTypeInName,
        LintRule::ReservedChars,
        LintRule::CamelCase,
        LintRule::UnitAbbreviations,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LintRule::Help => "Help",
            LintRule::MetricUnits => "MetricUnits",
            LintRule::Counter => "Counter",
            LintRule::HistogramSummaryReserved => "HistogramSummaryReserved",
            LintRule::MetricTypeInName => "MetricTypeInName",
            LintRule::ReservedChars => "ReservedChars",
            LintRule::CamelCase => "CamelCase",
            LintRule::UnitAbbreviations => "UnitAbbreviations",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            LintRule::Help => "detects issues related to the help text for a metric",
            LintRule::MetricUnits => "detects issues with metric unit names",
            LintRule::Counter => {
                "detects issues specific to counters, as well as patterns that should only be used with counters"
            }
            LintRule::HistogramSummaryReserved => {
                "detects when other types of metrics use names or labels reserved for use by histograms and/or summaries"
            }
            LintRule::MetricTypeInName => "detects when metric types are included in the metric name",
            LintRule::ReservedChars => "detects colons in metric names",
            LintRule::CamelCase => "detects metric names and label names written in camelCase",
            LintRule::UnitAbbreviations => "detects abbreviated units in the metric name",
        }
    }

    /// Comma-separated list of every rule name.
    pub fn supported() -> String {
        Self::ALL.map(Self::name).join(", ")
    }
}

/// Base units, followed by non-base units mapped to their base.
const UNITS: &[(&str, &str)] = &[
    ("amperes", "amperes"),
    ("bytes", "bytes"),
    ("celsius", "celsius"),
    ("grams", "grams"),
    ("joules", "joules"),
    ("kelvin", "kelvin"),
    ("meters", "meters"),
    ("metres", "metres"),
    ("seconds", "seconds"),
    ("volts", "volts"),
    ("minutes", "seconds"),
    ("hours", "seconds"),
    ("days", "seconds"),
    ("weeks", "seconds"),
    ("kelvins", "kelvin"),
    ("fahrenheit", "celsius"),
    ("rankine", "celsius"),
    ("inches", "meters"),
    ("yards", "meters"),
    ("miles", "meters"),
    ("bits", "bytes"),
    ("calories", "joules"),
    ("pounds", "grams"),
    ("ounces", "grams"),
];

const UNIT_PREFIXES: &[&str] = &[
    "pico", "nano", "micro", "milli", "centi", "deci", "deca", "hecto", "kilo", "kibi", "mega",
    "mebi", "giga", "gibi", "tera", "tebi", "peta", "pebi",
];

const UNIT_ABBREVIATIONS: &[&str] = &[
    "s", "ms", "us", "ns", "sec", "b", "kb", "mb", "gb", "tb", "pb", "m", "h", "d",
];

/// The enabled rules plus the data they need.
#[derive(Debug, Clone)]
pub struct RuleSet {
    enabled: Vec<LintRule>,
    camel_case: Regex,
}

impl RuleSet {
    pub fn standard() -> Self {
        Self {
            enabled: LintRule::ALL.to_vec(),
            camel_case: Regex::new("[a-z][A-Z]").expect("invalid camelCase regex"),
        }
    }

    /// Standard rules minus the named ones. Unknown names are rejected.
    pub fn with_disabled<S: AsRef<str>>(disabled: &[S]) -> Result<Self, ConfigError> {
        let mut off = BTreeSet::new();
        for name in disabled {
            let name = name.as_ref();
            let rule = LintRule::from_name(name).ok_or_else(|| ConfigError::UnknownRule {
                name: name.to_string(),
                supported: LintRule::supported(),
            })?;
            off.insert(rule);
        }
        let mut set = Self::standard();
        set.enabled.retain(|r| !off.contains(r));
        Ok(set)
    }

    pub fn enabled(&self) -> &[LintRule] {
        &self.enabled
    }

    /// Apply every enabled rule to every descriptor, preserving catalog order.
    pub fn lint(&self, metrics: &[MetricDescriptor]) -> Vec<Issue> {
        let mut issues = Vec::new();
        for m in metrics {
            for rule in &self.enabled {
                for text in self.check(*rule, m) {
                    issues.push(Issue {
                        position: m.position.clone(),
                        metric: m.fq_name.clone(),
                        rule: rule.name().to_string(),
                        text,
                    });
                }
            }
        }
        issues
    }

    fn check(&self, rule: LintRule, m: &MetricDescriptor) -> Vec<String> {
        match rule {
            LintRule::Help => lint_help(m),
            LintRule::MetricUnits => lint_metric_units(m),
            LintRule::Counter => lint_counter(m),
            LintRule::HistogramSummaryReserved => lint_histogram_summary_reserved(m),
            LintRule::MetricTypeInName => lint_metric_type_in_name(m),
            LintRule::ReservedChars => lint_reserved_chars(m),
            LintRule::CamelCase => self.lint_camel_case(m),
            LintRule::UnitAbbreviations => lint_unit_abbreviations(m),
        }
    }

    fn lint_camel_case(&self, m: &MetricDescriptor) -> Vec<String> {
        let mut out = Vec::new();
        if self.camel_case.is_match(&m.fq_name) {
            out.push("metric names should be written in 'snake_case' not 'camelCase'".to_string());
        }
        for label in m.label_names() {
            if self.camel_case.is_match(label) {
                out.push("label names should be written in 'snake_case' not 'camelCase'".to_string());
            }
        }
        out
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

fn lint_help(m: &MetricDescriptor) -> Vec<String> {
    match m.help.as_deref() {
        None | Some("") => vec!["no help text".to_string()],
        Some(_) => Vec::new(),
    }
}

fn lint_metric_units(m: &MetricDescriptor) -> Vec<String> {
    match metric_units(&m.fq_name) {
        Some((unit, base)) => vec![format!("use base unit {base:?} instead of {unit:?}")],
        None => Vec::new(),
    }
}

/// First name part that is a prefixed unit or a non-base unit.
fn metric_units(name: &str) -> Option<(String, &'static str)> {
    // The first part naming any unit decides; later parts are not consulted.
    for part in name.split('_') {
        let matched = UNITS.iter().find_map(|&(unit, base)| {
            let prefix = part.strip_suffix(unit)?;
            (prefix.is_empty() || UNIT_PREFIXES.contains(&prefix)).then_some((prefix, unit, base))
        });
        if let Some((prefix, unit, base)) = matched {
            if !prefix.is_empty() || unit != base {
                return Some((part.to_string(), base));
            }
            return None;
        }
    }
    None
}

fn lint_counter(m: &MetricDescriptor) -> Vec<String> {
    let is_counter = m.metric_type == MetricType::Counter;
    let is_untyped = m.metric_type == MetricType::Untyped;
    let has_total = m.fq_name.ends_with("_total");
    if is_counter && !has_total {
        vec![r#"counter metrics should have "_total" suffix"#.to_string()]
    } else if !is_untyped && !is_counter && has_total {
        vec![r#"non-counter metrics should not have "_total" suffix"#.to_string()]
    } else {
        Vec::new()
    }
}

fn lint_histogram_summary_reserved(m: &MetricDescriptor) -> Vec<String> {
    let t = m.metric_type;
    if t == MetricType::Untyped {
        return Vec::new();
    }
    let n = &m.fq_name;
    let mut out = Vec::new();
    if t != MetricType::Histogram {
        if n.ends_with("_bucket") {
            out.push(r#"non-histogram metrics should not have "_bucket" suffix"#.to_string());
        }
        if m.label_names().any(|l| l == "le") {
            out.push(r#"non-histogram metrics should not have "le" label"#.to_string());
        }
    }
    if t != MetricType::Histogram && t != MetricType::Summary {
        if n.ends_with("_count") {
            out.push(r#"non-histogram and non-summary metrics should not have "_count" suffix"#.to_string());
        }
        if n.ends_with("_sum") {
            out.push(r#"non-histogram and non-summary metrics should not have "_sum" suffix"#.to_string());
        }
    }
    if t != MetricType::Summary && m.label_names().any(|l| l == "quantile") {
        out.push(r#"non-summary metrics should not have "quantile" label"#.to_string());
    }
    out
}

fn lint_metric_type_in_name(m: &MetricDescriptor) -> Vec<String> {
    if m.metric_type == MetricType::Untyped {
        return Vec::new();
    }
    let n = m.fq_name.to_lowercase();
    let type_name = m.metric_type.as_str().to_lowercase();
    if n.contains(&format!("_{type_name}_")) || n.ends_with(&format!("_{type_name}")) {
        vec![format!("metric name should not include type '{type_name}'")]
    } else {
        Vec::new()
    }
}

fn lint_reserved_chars(m: &MetricDescriptor) -> Vec<String> {
    if m.fq_name.contains(':') {
        vec!["metric names should not contain ':'".to_string()]
    } else {
        Vec::new()
    }
}

fn lint_unit_abbreviations(m: &MetricDescriptor) -> Vec<String> {
    let n = m.fq_name.to_lowercase();
    let abbreviated = UNIT_ABBREVIATIONS
        .iter()
        .any(|s| n.contains(&format!("_{s}_")) || n.ends_with(&format!("_{s}")));
    if abbreviated {
        vec!["metric names should not contain abbreviated units".to_string()]
    } else {
        Vec::new()
    }
}
