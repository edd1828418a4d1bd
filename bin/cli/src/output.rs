//! Output formatting for the terminal client.

use clap::ValueEnum;
use serde::Serialize;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prints `value` as pretty JSON, or as text through `text`.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, text: impl FnOnce(&T)) {
    match format {
        OutputFormat::Text => text(value),
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error: failed to encode output: {e}"),
        },
    }
}

/// Prints a list, one item per text line, or a note when it is empty.
pub fn print_list<T: Serialize>(
    items: &[T],
    format: OutputFormat,
    empty: &str,
    line: impl Fn(&T) -> String,
) {
    print(&items, format, |items| {
        if items.is_empty() {
            println!("{empty}");
        }
        for item in *items {
            println!("{}", line(item));
        }
    });
}

/// Prints a success message.
pub fn print_success(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{message}"),
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({"status": "success", "message": message})
            );
        }
    }
}

/// Prints an error message.
pub fn print_error(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {message}"),
        OutputFormat::Json => {
            eprintln!(
                "{}",
                serde_json::json!({"status": "error", "message": message})
            );
        }
    }
}

/// Prints a labelled row.
pub fn print_row(label: &str, value: &str) {
    println!("  {:<24} {}", format!("{label}:"), value);
}

/// Prints a heading with a divider.
pub fn print_heading(text: &str) {
    println!("\n{text}");
    println!("{}", "-".repeat(50));
}

/// Formats an amount with two decimals.
#[must_use]
pub fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_rounds_to_cents() {
        assert_eq!(money(12.5), "12.50");
        assert_eq!(money(-120.0), "-120.00");
    }
}
