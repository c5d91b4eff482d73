//! Output helpers shared by every command.

use colored::Colorize;
use serde::Serialize;

use crate::OutputFormat;

/// Print a serializable result. Text format falls back to pretty JSON.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Text => serde_json::to_string_pretty(value),
    };
    match rendered {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{}: failed to serialize output: {}", "Error".red().bold(), e),
    }
}

/// Print a success line in text mode.
pub fn success(message: &str, format: OutputFormat, quiet: bool) {
    if quiet || matches!(format, OutputFormat::Json) {
        return;
    }
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning line in text mode.
pub fn warning(message: &str, format: OutputFormat, quiet: bool) {
    if quiet || matches!(format, OutputFormat::Json) {
        return;
    }
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}
