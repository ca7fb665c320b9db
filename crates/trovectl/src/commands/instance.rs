//! Instance command handlers

use serde_json::Value;
use tracing::debug;
use trovectl_core::v1::{InstanceEdit, NewInstance, NewUser};
use trovectl_core::{Resource, TroveClient, find_resource, getid};

use crate::cli::{InstanceCommands, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::{Result as CliResult, TroveCtlError};

use super::utils::{print_accepted, print_list, print_one, print_page, read_json_input};

pub const INSTANCE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "datastore.type",
    "datastore.version",
    "status",
    "flavor.id",
    "volume.size",
];

const BACKUP_COLUMNS: &[&str] = &["id", "name", "status", "created", "description"];

pub async fn handle_instance_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: &InstanceCommands,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    match command {
        InstanceCommands::List { page, all } => {
            if *all {
                let instances = client.instances.list_all().await?;
                print_list(&instances, INSTANCE_COLUMNS, output_format, query)
            } else {
                let instances = client
                    .instances
                    .list(page.limit, page.marker.as_deref())
                    .await?;
                print_page(&instances, INSTANCE_COLUMNS, output_format, query)
            }
        }
        InstanceCommands::Show { instance } => {
            let instance = find_resource(&client.instances, instance).await?;
            print_one(&instance, output_format, query)
        }
        InstanceCommands::Create {
            name,
            flavor,
            size,
            databases,
            users,
            backup,
            availability_zone,
            datastore,
            datastore_version,
            nics,
            configuration,
            replica_of,
        } => {
            let flavor = find_resource(&client.flavors, flavor).await?;
            let mut params = NewInstance::new(name, getid(&flavor)?);
            params.volume_size = *size;
            params.databases = databases.clone();
            params.users = users
                .iter()
                .map(|(user, password)| {
                    let mut new_user = NewUser::new(user, password);
                    new_user.databases = databases.clone();
                    new_user
                })
                .collect();
            params.availability_zone = availability_zone.clone();
            params.datastore = datastore.clone();
            params.datastore_version = datastore_version.clone();
            params.nics = nics
                .iter()
                .map(|nic| parse_nic(nic))
                .collect::<CliResult<Vec<_>>>()?;

            if let Some(backup) = backup {
                let backup = find_resource(&client.backups, backup).await?;
                params.restore_point = Some(getid(&backup)?);
            }
            if let Some(configuration) = configuration {
                let configuration = find_resource(&client.configurations, configuration).await?;
                params.configuration = Some(getid(&configuration)?);
            }
            if let Some(replica_of) = replica_of {
                let source = find_resource(&client.instances, replica_of).await?;
                params.replica_of = Some(getid(&source)?);
            }

            debug!("Creating instance {} with flavor {}", name, params.flavor);
            let instance = client.instances.create(&params).await?;
            print_one(&instance, output_format, query)
        }
        InstanceCommands::Update {
            instance,
            name,
            configuration,
            remove_configuration,
        } => {
            let instance = find_resource(&client.instances, instance).await?;
            let configuration = match configuration {
                Some(configuration) => Some(resolve_configuration(&client, configuration).await?),
                None => None,
            };
            if name.is_none() && configuration.is_none() && !remove_configuration {
                return Err(TroveCtlError::InvalidInput {
                    message: "nothing to update; pass --name, --configuration or --remove-configuration"
                        .to_string(),
                });
            }

            let changes = InstanceEdit {
                name: name.clone(),
                configuration,
                remove_configuration: *remove_configuration,
            };
            client.instances.edit(&instance, &changes).await?;
            print_accepted(&format!("Instance {} updated.", display(&instance)), output_format)
        }
        InstanceCommands::Delete { instance } => {
            let instance = find_resource(&client.instances, instance).await?;
            client.instances.delete(&instance).await?;
            print_accepted(
                &format!("Instance {} is being deleted.", display(&instance)),
                output_format,
            )
        }
        InstanceCommands::Restart { instance } => {
            let instance = find_resource(&client.instances, instance).await?;
            client.instances.restart(&instance).await?;
            print_accepted(
                &format!("Instance {} is restarting.", display(&instance)),
                output_format,
            )
        }
        InstanceCommands::ResizeVolume { instance, size } => {
            let instance = find_resource(&client.instances, instance).await?;
            client.instances.resize_volume(&instance, *size).await?;
            print_accepted(
                &format!("Volume of instance {} is resizing to {}GB.", display(&instance), size),
                output_format,
            )
        }
        InstanceCommands::ResizeFlavor { instance, flavor } => {
            let instance = find_resource(&client.instances, instance).await?;
            let flavor = getid(&find_resource(&client.flavors, flavor).await?)?;
            client.instances.resize_instance(&instance, &flavor).await?;
            print_accepted(
                &format!(
                    "Instance {} is resizing to flavor {}.",
                    display(&instance),
                    flavor
                ),
                output_format,
            )
        }
        InstanceCommands::AttachConfiguration {
            instance,
            configuration,
        } => {
            let instance = find_resource(&client.instances, instance).await?;
            let configuration = resolve_configuration(&client, configuration).await?;
            client
                .instances
                .modify(&instance, Some(&configuration))
                .await?;
            print_accepted(
                &format!(
                    "Configuration {} attached to instance {}.",
                    configuration,
                    display(&instance)
                ),
                output_format,
            )
        }
        InstanceCommands::DetachConfiguration { instance } => {
            let instance = find_resource(&client.instances, instance).await?;
            client.instances.modify(&instance, None).await?;
            print_accepted(
                &format!("Configuration detached from instance {}.", display(&instance)),
                output_format,
            )
        }
        InstanceCommands::Configuration { instance } => {
            let instance = find_resource(&client.instances, instance).await?;
            let configuration = client.instances.configuration(&instance).await?;
            print_one(&flatten_configuration(configuration), output_format, query)
        }
        InstanceCommands::Backups { instance, page } => {
            let instance = find_resource(&client.instances, instance).await?;
            let backups = client
                .instances
                .backups(&instance, page.limit, page.marker.as_deref())
                .await?;
            print_page(&backups, BACKUP_COLUMNS, output_format, query)
        }
    }
}

async fn resolve_configuration(client: &TroveClient, token: &str) -> CliResult<String> {
    let configuration = find_resource(&client.configurations, token).await?;
    Ok(getid(&configuration)?)
}

fn parse_nic(nic: &str) -> CliResult<Value> {
    let value = read_json_input(nic)?;
    if !value.is_object() {
        return Err(TroveCtlError::InvalidInput {
            message: format!("--nic expects a JSON object, got '{}'", nic),
        });
    }
    Ok(value)
}

/// `name (id)` when the instance has a name, else just the id
fn display(instance: &Resource) -> String {
    match (instance.str_attr("name"), instance.id()) {
        (Some(name), Some(id)) => format!("{} ({})", name, id),
        _ => instance.id().unwrap_or_default().to_string(),
    }
}

/// The configuration endpoint nests values under `configuration`; show them
/// as top-level properties
fn flatten_configuration(mut resource: Resource) -> Resource {
    if let Some(Value::Object(values)) = resource.attr("configuration").cloned() {
        resource.add_details(values);
    }
    resource
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trovectl_core::v1::INSTANCE;

    #[test]
    fn test_parse_nic() {
        assert_eq!(parse_nic(r#"{"net-id": "n1"}"#).unwrap(), json!({"net-id": "n1"}));
        assert!(parse_nic(r#""n1""#).is_err());
    }

    #[test]
    fn test_display() {
        let named = Resource::from_value(&INSTANCE, json!({"id": "abc", "name": "db"}), true).unwrap();
        assert_eq!(display(&named), "db (abc)");
        let bare = Resource::from_value(&INSTANCE, json!({"id": "abc"}), true).unwrap();
        assert_eq!(display(&bare), "abc");
    }

    #[test]
    fn test_flatten_configuration() {
        let resource = Resource::from_value(
            &INSTANCE,
            json!({"id": "abc", "configuration": {"max_connections": 100}}),
            true,
        )
        .unwrap();
        let flat = flatten_configuration(resource);
        assert_eq!(flat.attr("max_connections"), Some(&json!(100)));
    }
}
