//! Configuration discovery and effective settings resolution.
//!
//! Promlinter reads `promlinter.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `strict`: false
//! - `with_vendor`: false
//! - `output`: the command's own default (`table` for list, `human` for lint)
//! - `disable`: empty
//! - `list.add_help|add_position|add_module`: false
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::ConfigError;
use crate::rules::LintRule;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "promlinter::config";

const CONFIG_NAMES: [&str; 3] = ["promlinter.toml", "promlinter.yaml", "promlinter.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Listing options under `[list]`.
pub struct ListCfg {
    pub add_help: Option<bool>,
    pub add_position: Option<bool>,
    pub add_module: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `promlinter.toml|yaml`.
pub struct PromlinterConfig {
    pub strict: Option<bool>,
    pub with_vendor: Option<bool>,
    pub output: Option<String>,
    #[serde(default)]
    pub disable: Vec<String>,
    pub list: Option<ListCfg>,
}

/// Values given on the command line; `None` defers to the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub start: Option<PathBuf>,
    pub strict: Option<bool>,
    pub with_vendor: Option<bool>,
    pub output: Option<String>,
    /// Appended to the config file's list rather than replacing it.
    pub disable: Vec<String>,
    pub add_help: Option<bool>,
    pub add_position: Option<bool>,
    pub add_module: Option<bool>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub strict: bool,
    pub with_vendor: bool,
    pub output: Option<String>,
    pub disable: Vec<String>,
    pub add_help: bool,
    pub add_position: bool,
    pub add_module: bool,
}

impl Effective {
    pub fn output_or(&self, default: &str) -> String {
        self.output.clone().unwrap_or_else(|| default.to_string())
    }
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `promlinter.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `PromlinterConfig` from `promlinter.toml` or `promlinter.yaml|yml`
/// if present. A present but unreadable or invalid file is an error.
pub fn load_config(root: &Path) -> Result<Option<PromlinterConfig>, ConfigError> {
    let toml_path = root.join("promlinter.toml");
    if toml_path.exists() {
        let s = read(&toml_path)?;
        let cfg = toml::from_str(&s).map_err(|source| ConfigError::Toml {
            path: toml_path.to_string_lossy().to_string(),
            source,
        })?;
        log::debug!(target: LOG_TARGET, "loaded {}", toml_path.display());
        return Ok(Some(cfg));
    }
    for yml in ["promlinter.yaml", "promlinter.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = read(&p)?;
            let cfg = serde_yaml::from_str(&s).map_err(|source| ConfigError::Yaml {
                path: p.to_string_lossy().to_string(),
                source,
            })?;
            log::debug!(target: LOG_TARGET, "loaded {}", p.display());
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string_lossy().to_string(),
        source,
    })
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// Rule names in the merged disable list are validated here so a typo fails
/// before any file is scanned.
pub fn resolve_effective(cli: Overrides) -> Result<Effective, ConfigError> {
    let start = cli.start.unwrap_or_else(|| PathBuf::from("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root)?.unwrap_or_default();
    let list = cfg.list.unwrap_or_default();

    let mut disable = cfg.disable;
    for name in cli.disable {
        if !disable.contains(&name) {
            disable.push(name);
        }
    }
    if let Some(bad) = disable.iter().find(|n| LintRule::from_name(n).is_none()) {
        return Err(ConfigError::UnknownRule {
            name: bad.clone(),
            supported: LintRule::supported(),
        });
    }

    Ok(Effective {
        repo_root,
        strict: cli.strict.or(cfg.strict).unwrap_or(false),
        with_vendor: cli.with_vendor.or(cfg.with_vendor).unwrap_or(false),
        output: cli.output.or(cfg.output),
        disable,
        add_help: cli.add_help.or(list.add_help).unwrap_or(false),
        add_position: cli.add_position.or(list.add_position).unwrap_or(false),
        add_module: cli.add_module.or(list.add_module).unwrap_or(false),
    })
}
