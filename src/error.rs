//! Error types shared across the crate.

use crate::ast::Position;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{path}:{line}:{column}: {message}")]
/// A source file that could not be read or parsed.
pub struct ParseError {
    pub path: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn unreadable(path: &str, err: &std::io::Error) -> Self {
        Self {
            path: path.to_string(),
            line: 0,
            column: 0,
            message: format!("cannot read file: {err}"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnquoteError {
    #[error("literal is not quoted: {0}")]
    NotQuoted(String),
    #[error("invalid escape sequence in {0}")]
    InvalidEscape(String),
    #[error("unescaped quote or newline in {0}")]
    Unterminated(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
/// Extraction aborted for one file.
pub enum ExtractError {
    #[error("{pos}: malformed string literal: {source}")]
    MalformedLiteral {
        pos: Position,
        #[source]
        source: UnquoteError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown lint rule '{name}' (supported: {supported})")]
    UnknownRule { name: String, supported: String },
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unsupported output format '{0}'")]
    Output(String),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("path does not exist: {0}")]
    NotFound(String),
    #[error("bad glob pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// A per-file failure collected during a run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

#[derive(Debug, Error)]
/// Rendering a result failed.
pub enum OutputError {
    #[error("cannot encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot encode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
