//! Run orchestration for `list` and `lint`.
//!
//! Files are parsed and scanned in parallel; per-file catalogs are joined
//! back in discovery order so output is stable across runs.

use crate::discovery::display_path;
use crate::error::{ConfigError, FileError};
use crate::matcher::{extract_file, ConstructorTable};
use crate::models::{LintResult, ListResult, MetricDescriptor, Summary};
use crate::parser::GoParser;
use crate::rules::RuleSet;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "promlinter::lint";

/// Options for a lint run.
#[derive(Debug, Clone, Default)]
pub struct Setting {
    /// Surface parse failures instead of skipping them.
    pub strict: bool,
    pub disabled_rules: Vec<String>,
}

fn scan_file(
    parser: &mut GoParser,
    path: &Path,
    base: &Path,
    constructors: &ConstructorTable,
) -> Result<Vec<MetricDescriptor>, FileError> {
    let display = display_path(path, base);
    let file = parser.parse_path(path, &display)?;
    Ok(extract_file(&file, constructors)?)
}

/// Extract the descriptor catalog of `files`.
///
/// Malformed literals are always reported. Parse failures are reported only
/// when `strict`; otherwise the file is skipped.
pub fn run_list(files: &[PathBuf], strict: bool) -> ListResult {
    let base = std::env::current_dir().unwrap_or_default();
    let constructors = ConstructorTable::standard();
    let per_file: Vec<Result<Vec<MetricDescriptor>, FileError>> = files
        .par_iter()
        .map_init(GoParser::new, |parser, path| {
            scan_file(parser, path, &base, &constructors)
        })
        .collect();

    let mut result = ListResult {
        files: files.len(),
        ..ListResult::default()
    };
    for outcome in per_file {
        match outcome {
            Ok(mut metrics) => result.metrics.append(&mut metrics),
            Err(FileError::Parse(e)) if !strict => {
                log::debug!(target: LOG_TARGET, "skipping unparsable file: {e}");
            }
            Err(e) => result.errors.push(e),
        }
    }
    log::debug!(
        target: LOG_TARGET,
        "{} metrics from {} files ({} errors)",
        result.metrics.len(),
        result.files,
        result.errors.len()
    );
    result
}

/// Extract and lint `files` with the enabled rule set.
pub fn run_lint(files: &[PathBuf], setting: &Setting) -> Result<LintResult, ConfigError> {
    let rules = RuleSet::with_disabled(&setting.disabled_rules)?;
    let listed = run_list(files, setting.strict);
    let issues = rules.lint(&listed.metrics);
    let summary = Summary {
        issues: issues.len(),
        metrics: listed.metrics.len(),
        files: listed.files,
        errors: listed.errors.len(),
    };
    Ok(LintResult {
        issues,
        errors: listed.errors,
        summary,
    })
}
