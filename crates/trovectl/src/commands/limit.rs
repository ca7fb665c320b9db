//! Limit command handlers

use crate::cli::{LimitCommands, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;

use super::utils::print_list;

/// Rate limits fill the first columns; the `ABSOLUTE` row fills the `max_*` ones
const LIMIT_COLUMNS: &[&str] = &[
    "verb",
    "value",
    "remaining",
    "unit",
    "max_instances",
    "max_volumes",
    "max_backups",
];

pub async fn handle_limit_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: &LimitCommands,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    match command {
        LimitCommands::List => {
            let limits = client.limits.list().await?;
            print_list(&limits, LIMIT_COLUMNS, output_format, query)
        }
    }
}
