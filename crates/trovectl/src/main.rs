use clap::{CommandFactory, Parser};
use clap_complete::{generate, shells};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trovectl_core::config::Config;

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{Cli, Commands};
use connection::ConnectionManager;
use error::TroveCtlError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level
    init_tracing(cli.verbose);

    let conn_mgr = match load_connection_manager(cli.config_file.as_deref()) {
        Ok(conn_mgr) => conn_mgr,
        Err(e) => {
            e.print_diagnostic();
            std::process::exit(1);
        }
    };

    if let Err(e) = execute_command(&cli, &conn_mgr).await {
        e.print_diagnostic();
        std::process::exit(1);
    }
}

/// Load configuration from the specified path or the default location
fn load_connection_manager(config_file: Option<&str>) -> Result<ConnectionManager, TroveCtlError> {
    let (config, config_path) = if let Some(config_file) = config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        let config = Config::load_from_path(&path)?;
        (config, Some(path))
    } else {
        debug!("Loading config from default location");
        (Config::load()?, None)
    };
    debug!(
        "Creating ConnectionManager with config_path: {:?}",
        config_path
    );
    Ok(ConnectionManager::with_config_path(config, config_path))
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "trovectl=warn,trovectl_core=warn",
            1 => "trovectl=info,trovectl_core=info",
            2 => "trovectl=debug,trovectl_core=debug",
            _ => "trovectl=trace,trovectl_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli, conn_mgr: &ConnectionManager) -> Result<(), TroveCtlError> {
    // Log command execution with sanitized parameters
    info!("Command: {}", format_command(&cli.command));

    let profile = cli.profile.as_deref();
    let query = cli.query.as_deref();
    let output_format = cli.output;

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Version => {
            debug!("Showing version information");
            match output_format {
                cli::OutputFormat::Json | cli::OutputFormat::Yaml => {
                    let output_data = serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "name": env!("CARGO_PKG_NAME"),
                    });
                    let fmt = output_format.resolve(output::OutputFormat::Json);
                    output::print_output(&output_data, fmt, query).map_err(TroveCtlError::from)
                }
                _ => {
                    println!("trovectl {}", env!("CARGO_PKG_VERSION"));
                    Ok(())
                }
            }
        }
        Commands::Completions { shell } => {
            debug!("Generating completions for {:?}", shell);
            generate_completions(*shell);
            Ok(())
        }
        Commands::CompleteIds { category, names } => {
            commands::completion::handle_complete_ids(conn_mgr, category, *names)
        }

        Commands::Profile(profile_cmd) => {
            debug!("Executing profile command");
            commands::profile::handle_profile_command(profile_cmd, conn_mgr, output_format).await
        }

        Commands::Api { method, path, data } => {
            info!(
                "API call: {} {} {}",
                method,
                path,
                if data.is_some() {
                    "with data"
                } else {
                    "no data"
                }
            );
            commands::api::handle_api_command(
                conn_mgr,
                profile,
                *method,
                path,
                data.as_deref(),
                output_format,
                query,
            )
            .await
        }

        Commands::Instance(cmd) => {
            commands::instance::handle_instance_command(conn_mgr, profile, cmd, output_format, query)
                .await
        }
        Commands::Database(cmd) => {
            commands::database::handle_database_command(conn_mgr, profile, cmd, output_format, query)
                .await
        }
        Commands::User(cmd) => {
            commands::user::handle_user_command(conn_mgr, profile, cmd, output_format, query).await
        }
        Commands::Root(cmd) => {
            commands::root::handle_root_command(conn_mgr, profile, cmd, output_format, query).await
        }
        Commands::Flavor(cmd) => {
            commands::flavor::handle_flavor_command(conn_mgr, profile, cmd, output_format, query)
                .await
        }
        Commands::Backup(cmd) => {
            commands::backup::handle_backup_command(conn_mgr, profile, cmd, output_format, query)
                .await
        }
        Commands::Configuration(cmd) => {
            commands::configuration::handle_configuration_command(
                conn_mgr,
                profile,
                cmd,
                output_format,
                query,
            )
            .await
        }
        Commands::Datastore(cmd) => {
            commands::datastore::handle_datastore_command(
                conn_mgr,
                profile,
                cmd,
                output_format,
                query,
            )
            .await
        }
        Commands::Limit(cmd) => {
            commands::limit::handle_limit_command(conn_mgr, profile, cmd, output_format, query)
                .await
        }
        Commands::Mgmt(cmd) => {
            commands::mgmt::handle_mgmt_command(conn_mgr, profile, cmd, output_format, query).await
        }
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => error!("Command failed after {:?}: {}", duration, e),
    }

    result
}

/// Generate shell completions
fn generate_completions(shell: cli::Shell) {
    let mut cmd = cli::Cli::command();
    let name = cmd.get_name().to_string();

    match shell {
        cli::Shell::Bash => generate(shells::Bash, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Zsh => generate(shells::Zsh, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Fish => generate(shells::Fish, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::PowerShell => {
            generate(shells::PowerShell, &mut cmd, name, &mut std::io::stdout())
        }
        cli::Shell::Elvish => generate(shells::Elvish, &mut cmd, name, &mut std::io::stdout()),
    }
}

/// Describe a command for the logs without leaking secrets
fn format_command(command: &Commands) -> String {
    use cli::{InstanceCommands, UserCommands};

    match command {
        Commands::Version => "version".to_string(),
        Commands::Completions { shell } => format!("completions {:?}", shell),
        Commands::CompleteIds { category, .. } => format!("complete-ids {}", category),
        Commands::Profile(cmd) => {
            use cli::ProfileCommands::*;
            match cmd {
                List => "profile list".to_string(),
                Path => "profile path".to_string(),
                Show { name } => format!("profile show {}", name),
                Set { name, .. } => format!("profile set {} [credentials redacted]", name),
                Remove { name } => format!("profile remove {}", name),
                Default { name } => format!("profile default {}", name),
            }
        }
        Commands::Api { method, path, .. } => format!("api {} {}", method, path),
        Commands::Instance(InstanceCommands::Create { name, .. }) => {
            format!("instance create {} [credentials redacted]", name)
        }
        Commands::Instance(cmd) => format!("instance {:?}", cmd),
        Commands::User(
            UserCommands::Create { name, .. }
            | UserCommands::Update { name, .. }
            | UserCommands::ChangePassword { name, .. },
        ) => format!("user change {} [password redacted]", name),
        Commands::User(cmd) => format!("user {:?}", cmd),
        Commands::Database(cmd) => format!("database {:?}", cmd),
        Commands::Root(cmd) => format!("root {:?}", cmd),
        Commands::Flavor(cmd) => format!("flavor {:?}", cmd),
        Commands::Backup(cmd) => format!("backup {:?}", cmd),
        Commands::Configuration(cmd) => format!("configuration {:?}", cmd),
        Commands::Datastore(cmd) => format!("datastore {:?}", cmd),
        Commands::Limit(cmd) => format!("limit {:?}", cmd),
        Commands::Mgmt(cmd) => format!("mgmt {:?}", cmd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_command_redacts_secrets() {
        let cli = Cli::try_parse_from([
            "trovectl", "profile", "set", "prod", "--url", "https://t/v1.0/x", "--token", "s3cret",
        ])
        .unwrap();
        let described = format_command(&cli.command);
        assert!(described.contains("prod"));
        assert!(!described.contains("s3cret"));

        let cli = Cli::try_parse_from([
            "trovectl", "user", "create", "orders", "app", "hunter2",
        ])
        .unwrap();
        assert!(!format_command(&cli.command).contains("hunter2"));

        let cli = Cli::try_parse_from([
            "trovectl", "instance", "create", "db", "--flavor", "1", "--user", "app:hunter2",
        ])
        .unwrap();
        assert!(!format_command(&cli.command).contains("hunter2"));
    }
}
