//! Rendering of command results as JSON, YAML or tables

use anyhow::{Context, Result};
use comfy_table::Table;
use jpx_core::Runtime;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use trovectl_core::Resource;

static JMESPATH_RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn jmespath_runtime() -> &'static Runtime {
    JMESPATH_RUNTIME.get_or_init(|| Runtime::builder().with_all_extensions().build())
}

/// Quote bare backtick literals (`` `foo` `` becomes `` `"foo"` ``); the
/// runtime only accepts JSON between backticks.
fn normalize_backtick_literals(query: &str) -> String {
    static BACKTICK_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(re) = BACKTICK_RE
        .get_or_init(|| Regex::new(r"`([^`\\]*(?:\\.[^`\\]*)*)`").ok())
        .as_ref()
    else {
        return query.to_string();
    };

    re.replace_all(query, |caps: &regex::Captures| {
        let content = &caps[1];
        let trimmed = content.trim();
        if serde_json::from_str::<Value>(trimmed).is_ok() {
            format!("`{}`", content)
        } else {
            let escaped = trimmed.replace('\\', "\\\\").replace('"', "\\\"");
            format!("`\"{}\"`", escaped)
        }
    })
    .into_owned()
}

/// Filter `data` through a JMESPath expression
pub fn apply_query(data: Value, query: Option<&str>) -> Result<Value> {
    let Some(query) = query else {
        return Ok(data);
    };
    let expr = jmespath_runtime()
        .compile(&normalize_backtick_literals(query))
        .with_context(|| format!("Invalid JMESPath expression: {}", query))?;
    expr.search(&data)
        .with_context(|| format!("JMESPath query failed: {}", query))
}

/// Concrete format, after `auto` has been resolved by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
}

pub fn print_output<T: Serialize>(data: T, format: OutputFormat, query: Option<&str>) -> Result<()> {
    let json_value = apply_query(serde_json::to_value(data)?, query)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json_value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&json_value)?);
        }
        OutputFormat::Table => {
            println!("{}", render_table(&json_value, None));
        }
    }

    Ok(())
}

/// Print a list of resources; tables show only `columns`, in that order
pub fn print_resources(
    resources: &[Resource],
    columns: &[&str],
    format: OutputFormat,
    query: Option<&str>,
) -> Result<()> {
    let infos = Value::Array(
        resources
            .iter()
            .map(|r| Value::Object(r.info().clone()))
            .collect(),
    );

    match (format, query) {
        (OutputFormat::Table, None) => {
            println!("{}", render_table(&infos, Some(columns)));
            Ok(())
        }
        _ => print_output(infos, format, query),
    }
}

/// Print one resource; tables are a key/value listing sorted by key
pub fn print_resource(resource: &Resource, format: OutputFormat, query: Option<&str>) -> Result<()> {
    let mut entries: Vec<(&String, &Value)> = resource.info().iter().collect();
    entries.sort_by_key(|(key, _)| *key);

    match (format, query) {
        (OutputFormat::Table, None) => {
            let mut table = Table::new();
            table.set_header(vec!["Property", "Value"]);
            for (key, value) in entries {
                table.add_row(vec![key.clone(), format_value(value)]);
            }
            println!("{}", table);
            Ok(())
        }
        _ => print_output(resource.info(), format, query),
    }
}

fn render_table(value: &Value, columns: Option<&[&str]>) -> String {
    match value {
        Value::Array(arr) => {
            let mut table = Table::new();
            let headers: Vec<String> = match columns {
                Some(columns) => columns.iter().map(|c| c.to_string()).collect(),
                None => match arr.first() {
                    Some(Value::Object(first)) => first.keys().cloned().collect(),
                    _ => vec!["Value".to_string()],
                },
            };
            table.set_header(&headers);

            for item in arr {
                let row: Vec<String> = match item {
                    Value::Object(obj) => headers
                        .iter()
                        .map(|h| format_value(lookup_column(obj, h)))
                        .collect(),
                    other => vec![format_value(other)],
                };
                table.add_row(row);
            }
            table.to_string()
        }
        Value::Object(obj) => {
            let mut table = Table::new();
            table.set_header(vec!["Key", "Value"]);
            for (key, val) in obj {
                table.add_row(vec![key.clone(), format_value(val)]);
            }
            table.to_string()
        }
        other => format_value(other),
    }
}

/// Columns may reach into nested objects with a dot, e.g. `volume.size`
fn lookup_column<'a>(obj: &'a serde_json::Map<String, Value>, column: &str) -> &'a Value {
    let mut parts = column.split('.');
    let first = parts.next().and_then(|p| obj.get(p));
    parts
        .try_fold(first, |current, part| Some(current.and_then(|v| v.get(part))))
        .flatten()
        .unwrap_or(&Value::Null)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) if arr.iter().all(|v| v.is_string() || v.is_number()) => arr
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(_) => value.to_string(),
    }
}
