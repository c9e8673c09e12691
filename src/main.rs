//! Promlinter CLI binary entry point.
//! Delegates to the library for discovery, extraction and lint, then prints results.

use clap::Parser;
use promlinter::cli::{Cli, Commands};
use promlinter::config::{self, Effective, Overrides};
use promlinter::discovery::discover;
use promlinter::lint::{self, Setting};
use promlinter::output::{self, ListColumns, ListFormat, LintFormat};
use promlinter::utils::error_prefix;
use std::path::PathBuf;

fn init_logging(level: &str) {
    let env = env_logger::Env::default().filter_or("RUST_LOG", level);
    env_logger::Builder::from_env(env)
        .format_module_path(false)
        .format_target(matches!(level, "debug" | "trace"))
        .init();
}

/// Print `msg` as an error and exit with the configuration/input status.
fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", error_prefix(), msg);
    std::process::exit(2);
}

fn files_for(paths: &[String], eff: &Effective) -> Vec<PathBuf> {
    discover(paths, eff.with_vendor).unwrap_or_else(|e| fail(e))
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::List {
            paths,
            strict,
            with_vendor,
            add_position,
            add_module,
            add_help,
            output,
        } => {
            let eff = config::resolve_effective(Overrides {
                strict: Commands::flag(strict),
                with_vendor: Commands::flag(with_vendor),
                output,
                add_help: Commands::flag(add_help),
                add_position: Commands::flag(add_position),
                add_module: Commands::flag(add_module),
                ..Overrides::default()
            })
            .unwrap_or_else(|e| fail(e));
            let format = ListFormat::parse(&eff.output_or("table")).unwrap_or_else(|e| fail(e));
            let files = files_for(&paths, &eff);
            let result = lint::run_list(&files, eff.strict);
            let cols = ListColumns {
                add_help: eff.add_help,
                add_position: eff.add_position,
                add_module: eff.add_module,
            };
            if let Err(e) = output::print_list(&result.metrics, format, cols) {
                fail(e);
            }
            output::print_errors(&result.errors);
            if !result.errors.is_empty() {
                std::process::exit(2);
            }
        }
        Commands::Lint {
            paths,
            strict,
            with_vendor,
            disable,
            output,
        } => {
            let eff = config::resolve_effective(Overrides {
                strict: Commands::flag(strict),
                with_vendor: Commands::flag(with_vendor),
                output,
                disable,
                ..Overrides::default()
            })
            .unwrap_or_else(|e| fail(e));
            let format = LintFormat::parse(&eff.output_or("human")).unwrap_or_else(|e| fail(e));
            let files = files_for(&paths, &eff);
            let setting = Setting {
                strict: eff.strict,
                disabled_rules: eff.disable.clone(),
            };
            let result = lint::run_lint(&files, &setting).unwrap_or_else(|e| fail(e));
            if let Err(e) = output::print_lint(&result, format) {
                fail(e);
            }
            output::print_errors(&result.errors);
            if !result.errors.is_empty() {
                std::process::exit(2);
            }
            if !result.issues.is_empty() {
                std::process::exit(1);
            }
        }
    }
}
