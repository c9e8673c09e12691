//! Shared data models for extraction and lint outputs.

pub mod metric;

use crate::ast::Position;
use crate::error::FileError;
use serde::Serialize;

pub use metric::{ConstLabel, MetricDescriptor, MetricRecord, MetricType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single lint issue attached to a metric.
pub struct Issue {
    pub position: Position,
    pub metric: String,
    /// Rule that produced the issue.
    pub rule: String,
    pub text: String,
}

#[derive(Debug, Default, Serialize)]
/// Aggregated lint summary used by printers.
pub struct Summary {
    pub issues: usize,
    pub metrics: usize,
    pub files: usize,
    pub errors: usize,
}

#[derive(Debug, Default)]
/// Descriptor catalog for a run plus per-file failures.
pub struct ListResult {
    pub metrics: Vec<MetricDescriptor>,
    pub errors: Vec<FileError>,
    pub files: usize,
}

#[derive(Debug, Default)]
/// Lint results container.
pub struct LintResult {
    pub issues: Vec<Issue>,
    pub errors: Vec<FileError>,
    pub summary: Summary,
}
