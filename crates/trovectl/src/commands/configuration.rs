//! Configuration group command handlers

use trovectl_core::v1::NewConfiguration;
use trovectl_core::{find_resource, getid};

use crate::cli::{ConfigurationCommands, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;

use super::instance::INSTANCE_COLUMNS;
use super::utils::{print_accepted, print_list, print_one, print_page, read_json_object};

const CONFIGURATION_COLUMNS: &[&str] = &["id", "name", "description", "datastore_version_id"];
const PARAMETER_COLUMNS: &[&str] = &["name", "type", "min", "max", "restart_required"];

pub async fn handle_configuration_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: &ConfigurationCommands,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    match command {
        ConfigurationCommands::List { page } => {
            let configurations = client
                .configurations
                .list(page.limit, page.marker.as_deref())
                .await?;
            print_page(&configurations, CONFIGURATION_COLUMNS, output_format, query)
        }
        ConfigurationCommands::Show { configuration } => {
            let configuration = find_resource(&client.configurations, configuration).await?;
            print_one(&configuration, output_format, query)
        }
        ConfigurationCommands::Create {
            name,
            values,
            description,
            datastore,
            datastore_version,
        } => {
            let mut params = NewConfiguration::new(name, read_json_object(values)?);
            params.description = description.clone();
            params.datastore = datastore.clone();
            params.datastore_version = datastore_version.clone();
            let configuration = client.configurations.create(&params).await?;
            print_one(&configuration, output_format, query)
        }
        ConfigurationCommands::Update {
            configuration,
            values,
            name,
            description,
        } => {
            let values = read_json_object(values)?;
            let configuration = find_resource(&client.configurations, configuration).await?;
            client
                .configurations
                .update(&configuration, &values, name.as_deref(), description.as_deref())
                .await?;
            print_accepted(
                &format!("Configuration {} updated.", getid(&configuration)?),
                output_format,
            )
        }
        ConfigurationCommands::Patch {
            configuration,
            values,
        } => {
            let values = read_json_object(values)?;
            let configuration = find_resource(&client.configurations, configuration).await?;
            client.configurations.edit(&configuration, &values).await?;
            print_accepted(
                &format!("Configuration {} patched.", getid(&configuration)?),
                output_format,
            )
        }
        ConfigurationCommands::Delete { configuration } => {
            let configuration = find_resource(&client.configurations, configuration).await?;
            client.configurations.delete(&configuration).await?;
            print_accepted(
                &format!("Configuration {} deleted.", getid(&configuration)?),
                output_format,
            )
        }
        ConfigurationCommands::Instances {
            configuration,
            page,
        } => {
            let configuration = find_resource(&client.configurations, configuration).await?;
            let instances = client
                .configurations
                .instances(&configuration, page.limit, page.marker.as_deref())
                .await?;
            print_page(&instances, &INSTANCE_COLUMNS[..2], output_format, query)
        }
        ConfigurationCommands::Parameters { datastore, version } => {
            let parameters = client
                .configuration_parameters
                .parameters(datastore, version)
                .await?;
            print_list(&parameters, PARAMETER_COLUMNS, output_format, query)
        }
        ConfigurationCommands::Parameter {
            datastore,
            version,
            name,
        } => {
            let parameter = client
                .configuration_parameters
                .get_parameter(datastore, version, name)
                .await?;
            print_one(&parameter, output_format, query)
        }
    }
}
