//! Small helpers shared by the binary and printers.

use owo_colors::OwoColorize;

/// Colors are on unless `NO_COLOR` is set.
pub fn colored() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// `error:` tag for stderr messages.
pub fn error_prefix() -> String {
    if colored() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}
