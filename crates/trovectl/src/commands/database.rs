//! Database command handlers

use trovectl_core::find_resource;

use crate::cli::{DatabaseCommands, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;

use super::utils::{print_accepted, print_page};

pub async fn handle_database_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: &DatabaseCommands,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    match command {
        DatabaseCommands::List { instance, page } => {
            let instance = find_resource(&client.instances, instance).await?;
            let databases = client
                .databases
                .list(&instance, page.limit, page.marker.as_deref())
                .await?;
            print_page(&databases, &["name"], output_format, query)
        }
        DatabaseCommands::Create { instance, names } => {
            let instance = find_resource(&client.instances, instance).await?;
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            client.databases.create(&instance, &names).await?;
            print_accepted(
                &format!("Creating database(s): {}", names.join(", ")),
                output_format,
            )
        }
        DatabaseCommands::Delete { instance, name } => {
            let instance = find_resource(&client.instances, instance).await?;
            client.databases.delete(&instance, name).await?;
            print_accepted(&format!("Database '{}' deleted.", name), output_format)
        }
    }
}
