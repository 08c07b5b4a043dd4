//! Terminal logging with a colored module prefix.
//!
//! ```ignore
//! log!("blog"; "wrote {} posts", count);
//! ```

use colored::{ColoredString, Colorize};
use std::io::{stdout, Write};

/// Logs a formatted message under a module prefix, e.g. `[blog] message`.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::log::log($module, &format!($($arg)*))
    }};
}

/// Writes `message` to stdout prefixed by the colored `[module]` tag. Write
/// failures are ignored; logging never aborts a build.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();
    writeln!(stdout, "{} {}", prefix, message).ok();
    stdout.flush().ok();
}

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{}]", module);
    match module.to_ascii_lowercase().as_str() {
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "build" => prefix.bright_green().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}
