//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "promlinter",
    version,
    about = "Static analysis of Prometheus metric declarations in Go code",
    long_about = "Promlinter finds Prometheus metrics declared with client_golang in Go sources without running them, lists them, and checks their names, labels and help text against the Prometheus naming conventions.\n\nConfiguration precedence: CLI > promlinter.toml > defaults.",
    after_help = "Examples:\n  promlinter list .\n  promlinter list ./pkg --add-help --output md\n  promlinter lint . --strict --disable Help",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Log level: error|warn|info|debug|trace (RUST_LOG overrides)"
    )]
    pub log_level: String,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current promlinter version.")]
    Version,
    /// List metrics
    #[command(
        visible_alias = "ls",
        about = "List metrics declared in Go files",
        long_about = "Print every metric whose name can be resolved statically. Metrics with computed names are skipped silently.",
        after_help = "Examples:\n  promlinter list .\n  promlinter list ./cmd ./pkg --add-position --output json"
    )]
    List {
        #[arg(default_value = ".", help = "Files or directories to scan")]
        paths: Vec<String>,
        #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Report files that fail to parse")]
        strict: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Scan vendor directories too")]
        with_vendor: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Show the position of each metric")]
        add_position: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Show the directory of each metric instead of its position")]
        add_module: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Show the help text of each metric")]
        add_help: bool,
        #[arg(short, long, help = "Output mode: table|json|yaml|md (default: table)")]
        output: Option<String>,
    },
    /// Lint metrics
    #[command(
        about = "Run lint checks",
        long_about = "Check every statically resolvable metric against the naming rules. Exits 1 when any issue is found.",
        after_help = "Examples:\n  promlinter lint .\n  promlinter lint . --disable Help --disable CamelCase\n  promlinter lint ./pkg --output json"
    )]
    Lint {
        #[arg(default_value = ".", help = "Files or directories to scan")]
        paths: Vec<String>,
        #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Report files that fail to parse")]
        strict: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Scan vendor directories too")]
        with_vendor: bool,
        #[arg(short, long = "disable", value_name = "RULE", help = "Disable a lint rule (repeatable)")]
        disable: Vec<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}

impl Commands {
    /// `Some(true)` for a set switch so an unset flag defers to the config file.
    pub fn flag(set: bool) -> Option<bool> {
        set.then_some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["promlinter", "list"]).unwrap();
        assert_eq!(cli.log_level, "warn");
        match cli.cmd {
            Commands::List { paths, strict, output, .. } => {
                assert_eq!(paths, vec!["."]);
                assert!(!strict);
                assert!(output.is_none());
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_parse_lint_repeated_disable() {
        let cli = Cli::try_parse_from([
            "promlinter", "lint", "pkg", "-s", "-d", "Help", "--disable", "Counter", "--output", "json",
        ])
        .unwrap();
        match cli.cmd {
            Commands::Lint {
                paths,
                strict,
                disable,
                output,
                ..
            } => {
                assert_eq!(paths, vec!["pkg"]);
                assert!(strict);
                assert_eq!(disable, vec!["Help", "Counter"]);
                assert_eq!(output.as_deref(), Some("json"));
            }
            _ => panic!("expected lint"),
        }
    }

    #[test]
    fn test_flag_defers_when_unset() {
        assert_eq!(Commands::flag(false), None);
        assert_eq!(Commands::flag(true), Some(true));
    }
}
