//! Root user command handlers

use colored::Colorize;
use serde_json::json;
use trovectl_core::find_resource;

use crate::cli::{OutputFormat, RootCommands};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output::{self, print_output};

use super::utils::resource_format;

pub async fn handle_root_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: &RootCommands,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    match command {
        RootCommands::Enable { instance } => {
            let instance = find_resource(&client.instances, instance).await?;
            let (name, password) = client.root.create(&instance).await?;
            match (resource_format(output_format), query) {
                (output::OutputFormat::Table, None) => {
                    println!("{} {}", "User:".dimmed(), name);
                    println!("{} {}", "Password:".dimmed(), password);
                }
                (format, query) => {
                    print_output(json!({"name": name, "password": password}), format, query)?
                }
            }
            Ok(())
        }
        RootCommands::Show { instance } => {
            let instance = find_resource(&client.instances, instance).await?;
            let enabled = client.root.is_root_enabled(&instance).await?;
            match (resource_format(output_format), query) {
                (output::OutputFormat::Table, None) => {
                    println!("{} {}", "Root enabled:".dimmed(), enabled);
                }
                (format, query) => print_output(json!({"rootEnabled": enabled}), format, query)?,
            }
            Ok(())
        }
    }
}
