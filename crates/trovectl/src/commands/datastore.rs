//! Datastore command handlers

use trovectl_core::find_resource;

use crate::cli::{DatastoreCommands, DatastoreMemberCommands, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;

use super::utils::{print_accepted, print_list, print_one};

const DATASTORE_COLUMNS: &[&str] = &["id", "name", "default_version"];
const VERSION_COLUMNS: &[&str] = &["id", "name", "active"];
const MEMBER_COLUMNS: &[&str] = &["id", "tenant_id", "datastore_version_id"];

pub async fn handle_datastore_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: &DatastoreCommands,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    match command {
        DatastoreCommands::List => {
            let datastores = client.datastores.list(None, None).await?;
            print_list(&datastores, DATASTORE_COLUMNS, output_format, query)
        }
        DatastoreCommands::Show { datastore } => {
            let datastore = find_resource(&client.datastores, datastore).await?;
            print_one(&datastore, output_format, query)
        }
        DatastoreCommands::Versions { datastore } => {
            let versions = client.datastore_versions.list(datastore, None, None).await?;
            print_list(&versions, VERSION_COLUMNS, output_format, query)
        }
        DatastoreCommands::VersionShow { version, datastore } => {
            let version = match datastore {
                Some(datastore) => client.datastore_versions.get(datastore, version).await?,
                None => client.datastore_versions.get_by_uuid(version).await?,
            };
            print_one(&version, output_format, query)
        }
        DatastoreCommands::Member(member_cmd) => match member_cmd {
            DatastoreMemberCommands::List { datastore, version } => {
                let members = client
                    .datastore_version_members
                    .list(datastore, version, None, None)
                    .await?;
                print_list(&members, MEMBER_COLUMNS, output_format, query)
            }
            DatastoreMemberCommands::Add {
                datastore,
                version,
                tenant,
            } => {
                let member = client
                    .datastore_version_members
                    .add(datastore, version, tenant)
                    .await?;
                print_one(&member, output_format, query)
            }
            DatastoreMemberCommands::Delete {
                datastore,
                version,
                member,
            } => {
                client
                    .datastore_version_members
                    .delete(datastore, version, member)
                    .await?;
                print_accepted(
                    &format!("Member {} removed from {} {}.", member, datastore, version),
                    output_format,
                )
            }
        },
    }
}

