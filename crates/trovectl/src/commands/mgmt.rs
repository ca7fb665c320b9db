//! Operator-only management command handlers

use trovectl_core::v1::NewFlavor;

use crate::cli::{MgmtCommands, MgmtInstanceCommands, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;

use super::utils::{print_accepted, print_one, print_page};

const MGMT_INSTANCE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "tenant_id",
    "status",
    "task_description",
    "server.host",
    "deleted",
];

pub async fn handle_mgmt_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: &MgmtCommands,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;
    let mgmt = &client.management;

    match command {
        MgmtCommands::Instance(instance_cmd) => match instance_cmd {
            MgmtInstanceCommands::List { deleted, page } => {
                let instances = mgmt
                    .index(*deleted, page.limit, page.marker.as_deref())
                    .await?;
                print_page(&instances, MGMT_INSTANCE_COLUMNS, output_format, query)
            }
            MgmtInstanceCommands::Show { instance } => {
                let instance = mgmt.show(instance).await?;
                print_one(&instance, output_format, query)
            }
            MgmtInstanceCommands::RootHistory { instance } => {
                let history = mgmt.root_enabled_history(instance).await?;
                print_one(&history, output_format, query)
            }
            MgmtInstanceCommands::Stop { instance } => {
                mgmt.stop(instance).await?;
                print_accepted(&format!("Instance {} is stopping.", instance), output_format)
            }
            MgmtInstanceCommands::Reboot { instance } => {
                mgmt.reboot(instance).await?;
                print_accepted(&format!("Instance {} is rebooting.", instance), output_format)
            }
            MgmtInstanceCommands::Migrate { instance, host } => {
                mgmt.migrate(instance, host.as_deref()).await?;
                let target = host.as_deref().unwrap_or("a host chosen by the scheduler");
                print_accepted(
                    &format!("Instance {} is migrating to {}.", instance, target),
                    output_format,
                )
            }
            MgmtInstanceCommands::Update { instance } => {
                mgmt.update(instance).await?;
                print_accepted(
                    &format!("Guest agent of instance {} is updating.", instance),
                    output_format,
                )
            }
            MgmtInstanceCommands::ResetTaskStatus { instance } => {
                mgmt.reset_task_status(instance).await?;
                print_accepted(
                    &format!("Task status of instance {} reset.", instance),
                    output_format,
                )
            }
        },
        MgmtCommands::FlavorCreate {
            name,
            ram,
            disk,
            vcpus,
            flavor_id,
            ephemeral,
            swap,
            rxtx_factor,
            service_type,
        } => {
            let mut params = NewFlavor::new(name, *ram, *disk, *vcpus);
            if let Some(flavor_id) = flavor_id {
                params.flavor_id = flavor_id.clone();
            }
            params.ephemeral = *ephemeral;
            params.swap = *swap;
            params.rxtx_factor = rxtx_factor.clone();
            params.service_type = service_type.clone();

            let flavor = client.mgmt_flavors.create(&params).await?;
            print_one(&flavor, output_format, query)
        }
    }
}
