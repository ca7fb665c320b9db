//! Raw API access commands for direct REST endpoint calls

use serde_json::Value;
use tracing::debug;
use trovectl_core::check_response;

use crate::cli::{HttpMethod, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output::{self, print_output};

use super::utils::read_json_input;

/// Handle raw API commands
pub async fn handle_api_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    method: HttpMethod,
    path: &str,
    data: Option<&str>,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    // Ensure path starts with /
    let normalized_path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    let body: Option<Value> = match data {
        Some(data) => Some(read_json_input(data)?),
        None => None,
    };
    let body = match method {
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
            Some(body.unwrap_or_else(|| serde_json::json!({})))
        }
        HttpMethod::Get | HttpMethod::Delete => body,
    };

    debug!("{} {}", method, normalized_path);
    let response = client
        .api()
        .request(method.into(), &normalized_path, body.as_ref())
        .await?;
    check_response(&response, &normalized_path)?;

    let format = output_format.resolve(output::OutputFormat::Json);
    print_output(
        response.body.unwrap_or(Value::Null),
        format,
        query,
    )?;
    Ok(())
}
