//! User command handlers

use serde_json::Value;
use trovectl_core::v1::{NewUser, UserChanges};
use trovectl_core::{Resource, find_resource};

use crate::cli::{OutputFormat, UserCommands};
use crate::connection::ConnectionManager;
use crate::error::{Result as CliResult, TroveCtlError};

use super::utils::{print_accepted, print_list, print_one, print_page};

const USER_COLUMNS: &[&str] = &["name", "host", "databases"];

pub async fn handle_user_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: &UserCommands,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    match command {
        UserCommands::List { instance, page } => {
            let instance = find_resource(&client.instances, instance).await?;
            let mut users = client
                .users
                .list(&instance, page.limit, page.marker.as_deref())
                .await?;
            if query.is_none() {
                users.iter_mut().for_each(database_names);
            }
            print_page(&users, USER_COLUMNS, output_format, query)
        }
        UserCommands::Show {
            instance,
            name,
            host,
        } => {
            let instance = find_resource(&client.instances, instance).await?;
            let mut user = client.users.get(&instance, name, host.as_deref()).await?;
            if query.is_none() {
                database_names(&mut user);
            }
            print_one(&user, output_format, query)
        }
        UserCommands::Create {
            instance,
            name,
            password,
            host,
            databases,
        } => {
            let instance = find_resource(&client.instances, instance).await?;
            let mut user = NewUser::new(name, password);
            user.host = host.clone();
            user.databases = databases.clone();
            client.users.create(&instance, &[user]).await?;
            print_accepted(&format!("User '{}' created.", name), output_format)
        }
        UserCommands::Delete {
            instance,
            name,
            host,
        } => {
            let instance = find_resource(&client.instances, instance).await?;
            client.users.delete(&instance, name, host.as_deref()).await?;
            print_accepted(&format!("User '{}' deleted.", name), output_format)
        }
        UserCommands::Update {
            instance,
            name,
            host,
            new_name,
            new_password,
            new_host,
        } => {
            if new_name.is_none() && new_password.is_none() && new_host.is_none() {
                return Err(TroveCtlError::InvalidInput {
                    message: "nothing to update; pass --new-name, --new-password or --new-host"
                        .to_string(),
                });
            }
            let instance = find_resource(&client.instances, instance).await?;
            let changes = UserChanges {
                name: new_name.clone(),
                password: new_password.clone(),
                host: new_host.clone(),
            };
            client
                .users
                .update_attributes(&instance, name, host.as_deref(), &changes)
                .await?;
            print_accepted(&format!("User '{}' updated.", name), output_format)
        }
        UserCommands::ChangePassword {
            instance,
            name,
            password,
            host,
        } => {
            let instance = find_resource(&client.instances, instance).await?;
            let mut user = NewUser::new(name, password);
            user.host = host.clone();
            client.users.change_passwords(&instance, &[user]).await?;
            print_accepted(&format!("Password of user '{}' changed.", name), output_format)
        }
        UserCommands::Grant {
            instance,
            name,
            databases,
            host,
        } => {
            let instance = find_resource(&client.instances, instance).await?;
            let databases: Vec<&str> = databases.iter().map(String::as_str).collect();
            client
                .users
                .grant(&instance, name, &databases, host.as_deref())
                .await?;
            print_accepted(
                &format!("User '{}' granted access to: {}", name, databases.join(", ")),
                output_format,
            )
        }
        UserCommands::Revoke {
            instance,
            name,
            database,
            host,
        } => {
            let instance = find_resource(&client.instances, instance).await?;
            client
                .users
                .revoke(&instance, name, database, host.as_deref())
                .await?;
            print_accepted(
                &format!("Access of user '{}' to '{}' revoked.", name, database),
                output_format,
            )
        }
        UserCommands::Access {
            instance,
            name,
            host,
        } => {
            let instance = find_resource(&client.instances, instance).await?;
            let databases = client
                .users
                .list_access(&instance, name, host.as_deref())
                .await?;
            print_list(&databases, &["name"], output_format, query)
        }
    }
}

/// Replace `databases: [{"name": ..}]` with the bare names for display
fn database_names(user: &mut Resource) {
    let names: Option<Vec<Value>> = user.attr("databases").and_then(Value::as_array).map(|dbs| {
        dbs.iter()
            .filter_map(|db| db.get("name").cloned())
            .collect()
    });
    if let Some(names) = names {
        user.set_attr("databases", Value::Array(names));
    }
}
