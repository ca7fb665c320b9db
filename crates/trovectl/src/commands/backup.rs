//! Backup command handlers

use trovectl_core::{find_resource, getid};

use crate::cli::{BackupCommands, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;

use super::utils::{print_accepted, print_one, print_page};

const BACKUP_COLUMNS: &[&str] = &["id", "instance_id", "name", "status", "description"];

pub async fn handle_backup_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: &BackupCommands,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    match command {
        BackupCommands::List { page } => {
            let backups = client
                .backups
                .list(page.limit, page.marker.as_deref())
                .await?;
            print_page(&backups, BACKUP_COLUMNS, output_format, query)
        }
        BackupCommands::Show { backup } => {
            let backup = find_resource(&client.backups, backup).await?;
            print_one(&backup, output_format, query)
        }
        BackupCommands::Create {
            instance,
            name,
            description,
        } => {
            let instance = find_resource(&client.instances, instance).await?;
            let backup = client
                .backups
                .create(name, &instance, description.as_deref())
                .await?;
            print_one(&backup, output_format, query)
        }
        BackupCommands::Delete { backup } => {
            let backup = find_resource(&client.backups, backup).await?;
            client.backups.delete(&backup).await?;
            print_accepted(
                &format!("Backup {} is being deleted.", getid(&backup)?),
                output_format,
            )
        }
    }
}
