//! Output formatting utilities for CLI

use anyhow::Result;
use console::style;
use serde::Serialize;

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format an error message
pub fn format_error(msg: &str) -> String {
    style(format!("Error: {}", msg)).red().to_string()
}

/// Format a success message
pub fn format_success(msg: &str) -> String {
    style(format!("Success: {}", msg)).green().to_string()
}
