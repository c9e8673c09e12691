//! Promlinter core library.
//!
//! This crate finds Prometheus metric declarations in Go source files by
//! static analysis, turns them into descriptors and checks them against the
//! Prometheus naming conventions.
//!
//! High-level modules:
//! - `parser`: Go source to the typed syntax model in `ast`.
//! - `imports`: Which local names refer to the client and factory packages.
//! - `resolve`: Per-file identifier table and one-hop string resolution.
//! - `matcher`: Constructor call recognition and `extract_file`.
//! - `builder`: Descriptor assembly from option literals.
//! - `rules`: Lint rules and the rule registry.
//! - `lint`: Parallel `run_list` / `run_lint` over discovered files.
//! - `discovery`: Input path expansion.
//! - `config`: Discovery and effective configuration resolution.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `output`: Table/markdown/JSON/YAML printers.
//! - `models`: Descriptor, issue and result structs.
//! - `error`: Typed errors.
//! - `utils`: Supporting helpers.
pub mod ast;
pub mod builder;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod imports;
pub mod lint;
pub mod matcher;
pub mod models;
pub mod output;
pub mod parser;
pub mod resolve;
pub mod rules;
pub mod utils;
