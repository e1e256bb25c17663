//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::io::IsTerminal;
use std::path::Path;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Human-readable text, or indented JSON where there is no text form
    #[default]
    Pretty,
    /// Tables
    Table,
}

/// When to color output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Set up color output based on user preference
pub fn setup_colors(choice: ColorChoice) {
    let enabled = match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal(),
    };
    colored::control::set_override(enabled);
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {:#}", "Error:".red().bold(), error)
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        fs::write(path, content).with_context(|| format!("Failed to write output file: {}", path.display()))?;
        eprintln!("{}", format_success(&format!("Output written to {}", path.display())));
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Serialize a value as JSON, indented unless the format asks for compact output
pub fn format_json<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Pretty | OutputFormat::Table => serde_json::to_string_pretty(value),
    };
    text.context("Failed to serialize JSON")
}

/// Render rows as a table
pub fn format_table<T: tabled::Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    tabled::Table::new(rows).with(tabled::settings::Style::modern()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: &'static str,
        count: usize,
    }

    #[test]
    fn test_format_json() {
        let sample = Sample { name: "a", count: 2 };
        assert_eq!(format_json(&sample, OutputFormat::Json).unwrap(), r#"{"name":"a","count":2}"#);
        assert!(format_json(&sample, OutputFormat::Pretty).unwrap().contains('\n'));
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_output("hello", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }
}
