//! Flavor command handlers

use trovectl_core::find_resource;

use crate::cli::{FlavorCommands, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;

use super::utils::{print_list, print_one};

const FLAVOR_COLUMNS: &[&str] = &["id", "name", "ram", "vcpus", "disk"];

pub async fn handle_flavor_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: &FlavorCommands,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    match command {
        FlavorCommands::List => {
            let flavors = client.flavors.list().await?;
            print_list(&flavors, FLAVOR_COLUMNS, output_format, query)
        }
        FlavorCommands::Show { flavor } => {
            let flavor = find_resource(&client.flavors, flavor).await?;
            print_one(&flavor, output_format, query)
        }
    }
}
