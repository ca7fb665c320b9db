//! Shared helpers for resource command implementations

use anyhow::Context;
use colored::Colorize;
use serde_json::{Value, json};
use std::fs;
use trovectl_core::{Paginated, Resource};

use crate::cli::OutputFormat;
use crate::error::{Result as CliResult, TroveCtlError};
use crate::output::{self, print_output};

/// Resource commands render tables unless asked otherwise
pub fn resource_format(output_format: OutputFormat) -> output::OutputFormat {
    output_format.resolve(output::OutputFormat::Table)
}

/// Read file input, supporting @filename notation
pub fn read_file_input(input: &str) -> CliResult<String> {
    if let Some(filename) = input.strip_prefix('@') {
        fs::read_to_string(filename).map_err(|e| TroveCtlError::FileError {
            path: filename.to_string(),
            message: e.to_string(),
        })
    } else {
        Ok(input.to_string())
    }
}

/// Parse a JSON argument given inline or as @filename
pub fn read_json_input(input: &str) -> CliResult<Value> {
    let content = read_file_input(input)?;
    let value = serde_json::from_str(&content).with_context(|| match input.strip_prefix('@') {
        Some(filename) => format!("Failed to parse JSON from file: {}", filename),
        None => "Failed to parse JSON argument".to_string(),
    })?;
    Ok(value)
}

/// Like [`read_json_input`] but the value must be a JSON object
pub fn read_json_object(input: &str) -> CliResult<Value> {
    let value = read_json_input(input)?;
    if !value.is_object() {
        return Err(TroveCtlError::InvalidInput {
            message: "expected a JSON object, e.g. '{\"max_connections\": 200}'".to_string(),
        });
    }
    Ok(value)
}

pub fn print_list(
    resources: &[Resource],
    columns: &[&str],
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    output::print_resources(resources, columns, resource_format(output_format), query)?;
    Ok(())
}

/// Print one page of a listing; tables mention the marker of the next page
pub fn print_page(
    page: &Paginated<Resource>,
    columns: &[&str],
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let format = resource_format(output_format);
    output::print_resources(page, columns, format, query)?;

    if format == output::OutputFormat::Table
        && let Some(marker) = &page.next
    {
        eprintln!("{} --marker {}", "More results available:".dimmed(), marker);
    }
    Ok(())
}

pub fn print_one(resource: &Resource, output_format: OutputFormat, query: Option<&str>) -> CliResult<()> {
    output::print_resource(resource, resource_format(output_format), query)?;
    Ok(())
}

/// Report an action the service accepted without returning a body
pub fn print_accepted(message: &str, output_format: OutputFormat) -> CliResult<()> {
    match resource_format(output_format) {
        output::OutputFormat::Table => println!("{}", message),
        format => print_output(json!({ "message": message }), format, None)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_json_input_inline_and_file() {
        assert_eq!(read_json_input(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_connections": 200}}"#).unwrap();
        let arg = format!("@{}", file.path().display());
        assert_eq!(read_json_object(&arg).unwrap(), json!({"max_connections": 200}));
    }

    #[test]
    fn test_read_json_input_errors() {
        assert!(matches!(
            read_json_input("@/nonexistent/values.json"),
            Err(TroveCtlError::FileError { .. })
        ));
        assert!(matches!(
            read_json_input("{not json"),
            Err(TroveCtlError::InvalidInput { .. })
        ));
        assert!(matches!(
            read_json_object("[1, 2]"),
            Err(TroveCtlError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_resource_format() {
        assert_eq!(resource_format(OutputFormat::Auto), output::OutputFormat::Table);
        assert_eq!(resource_format(OutputFormat::Yaml), output::OutputFormat::Yaml);
    }
}
