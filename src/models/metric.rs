//! Metric descriptor model produced by extraction.

use crate::ast::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
    Summary,
    /// Only reachable through const metrics built with an untyped value.
    Untyped,
}

impl MetricType {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::Counter => "COUNTER",
            MetricType::Gauge => "GAUGE",
            MetricType::Histogram => "HISTOGRAM",
            MetricType::Summary => "SUMMARY",
            MetricType::Untyped => "UNTYPED",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A constant label; `value` is `None` when not statically known.
pub struct ConstLabel {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One statically-resolved metric declaration.
pub struct MetricDescriptor {
    pub metric_type: MetricType,
    pub fq_name: String,
    pub help: Option<String>,
    pub position: Position,
    /// Declared (per-observation) label names, in declaration order.
    pub variable_labels: Vec<String>,
    pub const_labels: Vec<ConstLabel>,
}

impl MetricDescriptor {
    /// Display label sequence: declared names, then `key=value` pairs with
    /// `?` standing in for unresolved values.
    pub fn labels(&self) -> Vec<String> {
        self.variable_labels
            .iter()
            .cloned()
            .chain(self.const_labels.iter().map(|c| {
                format!("{}={}", c.name, c.value.as_deref().unwrap_or("?"))
            }))
            .collect()
    }

    /// Every label name, declared and constant.
    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.variable_labels
            .iter()
            .map(String::as_str)
            .chain(self.const_labels.iter().map(|c| c.name.as_str()))
    }
}

#[derive(Debug, Clone, Serialize)]
/// Flat record used by the json/yaml listings.
pub struct MetricRecord {
    pub name: String,
    pub help: String,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    pub filename: String,
    pub line: usize,
    pub column: usize,
    pub labels: Vec<String>,
}

impl From<&MetricDescriptor> for MetricRecord {
    fn from(m: &MetricDescriptor) -> Self {
        Self {
            name: m.fq_name.clone(),
            help: m.help.clone().unwrap_or_default(),
            metric_type: m.metric_type,
            filename: m.position.file.clone(),
            line: m.position.line,
            column: m.position.column,
            labels: m.labels(),
        }
    }
}
