//! Output formatting for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;
use std::str::FromStr;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => anyhow::bail!("Unsupported output format: '{}'. Use 'text' or 'json'.", s),
        }
    }
}

/// Render data as pretty JSON
pub fn render_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize to JSON")
}

/// Render a list of lines in the requested format
pub fn render_lines(lines: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(lines.join("\n")),
        OutputFormat::Json => render_json(&lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_lines() {
        let lines = vec!["api-key".to_string(), "db-pass".to_string()];
        assert_eq!(render_lines(&lines, OutputFormat::Text).unwrap(), "api-key\ndb-pass");

        let json = render_lines(&lines, OutputFormat::Json).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, lines);
    }
}
