//! Output rendering for list and lint commands.
//!
//! `list` supports `table` (default), `md`, `json` and `yaml`; `lint`
//! supports `human` (default) and `json`. Rendering is split into pure
//! `compose_*` functions and thin `print_*` wrappers.

use crate::error::{ConfigError, FileError, OutputError};
use crate::models::{LintResult, MetricDescriptor, MetricRecord};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

const MIN_WIDTH: usize = 20;
const PADDING: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    Table,
    Markdown,
    Json,
    Yaml,
}

impl ListFormat {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "table" => Ok(Self::Table),
            "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            other => Err(ConfigError::Output(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintFormat {
    Human,
    Json,
}

impl LintFormat {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Output(other.to_string())),
        }
    }
}

/// Optional columns of the table and markdown listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListColumns {
    pub add_help: bool,
    pub add_position: bool,
    /// Show the file's directory in the position column.
    pub add_module: bool,
}

/// Print the metric listing in the requested format.
pub fn print_list(
    metrics: &[MetricDescriptor],
    format: ListFormat,
    cols: ListColumns,
) -> Result<(), OutputError> {
    match format {
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&compose_records(metrics))?),
        ListFormat::Yaml => print!("{}", serde_yaml::to_string(&compose_records(metrics))?),
        ListFormat::Table => print!("{}", compose_table(metrics, cols)),
        ListFormat::Markdown => print!("{}", compose_markdown(metrics, cols)),
    }
    Ok(())
}

/// Print lint results in the requested format.
pub fn print_lint(res: &LintResult, format: LintFormat) -> Result<(), OutputError> {
    match format {
        LintFormat::Json => println!("{}", serde_json::to_string_pretty(&compose_lint_json(res))?),
        LintFormat::Human => {
            let color = crate::utils::colored();
            for is in &res.issues {
                if color {
                    println!(
                        "{} {} {}",
                        is.position.bold(),
                        is.metric.cyan(),
                        is.text
                    );
                } else {
                    println!("{} {} {}", is.position, is.metric, is.text);
                }
            }
        }
    }
    Ok(())
}

/// Report per-file failures on stderr.
pub fn print_errors(errors: &[FileError]) {
    for e in errors {
        eprintln!("{} {}", crate::utils::error_prefix(), e);
    }
}

/// Flat records for the json/yaml listings.
pub fn compose_records(metrics: &[MetricDescriptor]) -> Vec<MetricRecord> {
    metrics.iter().map(MetricRecord::from).collect()
}

/// Compose lint JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(res: &LintResult) -> JsonVal {
    json!({
        "issues": res.issues,
        "errors": res.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "summary": res.summary,
    })
}

fn header(cols: ListColumns) -> Vec<String> {
    let mut fields = Vec::new();
    if cols.add_position || cols.add_module {
        fields.push("POSITION");
    }
    fields.extend(["TYPE", "NAME", "LABELS"]);
    if cols.add_help {
        fields.push("HELP");
    }
    fields.into_iter().map(String::from).collect()
}

fn row(m: &MetricDescriptor, cols: ListColumns, markdown: bool) -> Vec<String> {
    let labels = m.labels().join(",");
    let labels = if labels.is_empty() { "N/A".to_string() } else { labels };
    let mut out = Vec::new();
    if cols.add_position || cols.add_module {
        let pos = if cols.add_module {
            Path::new(&m.position.file)
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| ".".to_string())
        } else {
            m.position.to_string()
        };
        out.push(if markdown { format!("*{pos}*") } else { pos });
    }
    out.push(m.metric_type.to_string());
    if markdown {
        out.push(format!("`{}`", m.fq_name));
        out.push(format!("`{labels}`"));
    } else {
        out.push(m.fq_name.clone());
        out.push(labels);
    }
    if cols.add_help {
        out.push(m.help.clone().filter(|h| !h.is_empty()).unwrap_or_else(|| "N/A".to_string()));
    }
    out
}

/// Padded columns; the last column is never padded.
pub fn compose_table(metrics: &[MetricDescriptor], cols: ListColumns) -> String {
    let mut rows = vec![header(cols)];
    rows.extend(metrics.iter().map(|m| row(m, cols, false)));
    let n = rows[0].len();
    let widths: Vec<usize> = (0..n)
        .map(|i| {
            rows.iter()
                .map(|r| r[i].chars().count() + PADDING)
                .max()
                .unwrap_or(0)
                .max(MIN_WIDTH)
        })
        .collect();
    let mut out = String::new();
    for r in &rows {
        let mut line = String::new();
        for (i, cell) in r.iter().enumerate() {
            if i + 1 == n {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{cell:<width$}", width = widths[i]));
            }
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Pipe-delimited table with a header separator row.
pub fn compose_markdown(metrics: &[MetricDescriptor], cols: ListColumns) -> String {
    let head = header(cols);
    let mut out = format!("|{}|\n", head.join("|"));
    out.push_str(&"|---".repeat(head.len()));
    out.push_str("|\n");
    for m in metrics {
        out.push_str(&format!("|{}|\n", row(m, cols, true).join("|")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;
    use crate::models::{ConstLabel, Issue, MetricType, Summary};

    fn metrics() -> Vec<MetricDescriptor> {
        vec![
            MetricDescriptor {
                metric_type: MetricType::Counter,
                fq_name: "http_requests_total".into(),
                help: Some("Requests.".into()),
                position: Position::new("pkg/server/server.go", 13, 13),
                variable_labels: vec!["code".into()],
                const_labels: vec![ConstLabel {
                    name: "k".into(),
                    value: None,
                }],
            },
            MetricDescriptor {
                metric_type: MetricType::Gauge,
                fq_name: "up".into(),
                help: None,
                position: Position::new("main.go", 4, 2),
                variable_labels: Vec::new(),
                const_labels: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_compose_table_default_columns() {
        let out = compose_table(&metrics(), ListColumns::default());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], format!("{:<20}{:<22}LABELS", "TYPE", "NAME"));
        assert_eq!(lines[1], format!("{:<20}{:<22}code,k=?", "COUNTER", "http_requests_total"));
        assert_eq!(lines[2], format!("{:<20}{:<22}N/A", "GAUGE", "up"));
    }

    #[test]
    fn test_compose_table_module_and_help() {
        let cols = ListColumns {
            add_help: true,
            add_position: false,
            add_module: true,
        };
        let out = compose_table(&metrics(), cols);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("POSITION"));
        assert!(lines[0].ends_with("HELP"));
        assert!(lines[1].starts_with("pkg/server "));
        assert!(lines[1].ends_with("Requests."));
        assert!(lines[2].starts_with(". "));
        assert!(lines[2].ends_with("N/A"));
    }

    #[test]
    fn test_compose_markdown() {
        let cols = ListColumns {
            add_position: true,
            ..ListColumns::default()
        };
        let out = compose_markdown(&metrics(), cols);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "|POSITION|TYPE|NAME|LABELS|");
        assert_eq!(lines[1], "|---|---|---|---|");
        assert_eq!(
            lines[2],
            "|*pkg/server/server.go:13:13*|COUNTER|`http_requests_total`|`code,k=?`|"
        );
    }

    #[test]
    fn test_compose_records_shape() {
        let v = serde_json::to_value(compose_records(&metrics())).unwrap();
        assert_eq!(v[0]["filename"], "pkg/server/server.go");
        assert_eq!(v[0]["labels"], json!(["code", "k=?"]));
        assert_eq!(v[1]["help"], "");
        let yaml = serde_yaml::to_string(&compose_records(&metrics())).unwrap();
        assert!(yaml.contains("type: GAUGE"));
    }

    #[test]
    fn test_compose_lint_json_shape() {
        let res = LintResult {
            issues: vec![Issue {
                position: Position::new("a.go", 3, 9),
                metric: "foo".into(),
                rule: "Counter".into(),
                text: r#"counter metrics should have "_total" suffix"#.into(),
            }],
            errors: Vec::new(),
            summary: Summary {
                issues: 1,
                metrics: 1,
                files: 1,
                errors: 0,
            },
        };
        let out = compose_lint_json(&res);
        assert_eq!(out["summary"]["issues"], 1);
        assert_eq!(out["issues"][0]["position"]["line"], 3);
        assert_eq!(out["issues"][0]["rule"], "Counter");
        assert_eq!(out["errors"], json!([]));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(ListFormat::parse("md").unwrap(), ListFormat::Markdown);
        assert!(ListFormat::parse("human").is_err());
        assert_eq!(LintFormat::parse("json").unwrap(), LintFormat::Json);
        assert!(LintFormat::parse("table").is_err());
    }
}
