//! Resource command definitions

use clap::{Args, Subcommand};

/// Page selection shared by list commands
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Maximum number of items to return
    #[arg(long)]
    pub limit: Option<u32>,

    /// Return items after this ID
    #[arg(long)]
    pub marker: Option<String>,
}

/// Instance commands
#[derive(Subcommand, Debug)]
pub enum InstanceCommands {
    /// List instances
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Follow pagination links until the last page
        #[arg(long, conflicts_with_all = ["limit", "marker"])]
        all: bool,
    },

    /// Show an instance
    #[command(visible_alias = "get")]
    Show {
        /// Instance ID, ID prefix or name
        instance: String,
    },

    /// Create an instance
    #[command(after_help = "EXAMPLES:
    # Instance with a 2GB volume and two databases
    trovectl instance create orders --flavor m1.small --size 2 --database orders --database audit

    # Restore from a backup
    trovectl instance create restored --flavor 2 --size 2 --backup <backup-id>

    # Replica of an existing instance
    trovectl instance create orders-replica --flavor 2 --replica-of orders
")]
    Create {
        /// Name of the new instance
        name: String,

        /// Flavor ID or name
        #[arg(long)]
        flavor: String,

        /// Volume size in GB
        #[arg(long)]
        size: Option<u32>,

        /// Database to create; repeatable
        #[arg(long = "database")]
        databases: Vec<String>,

        /// User to create as name:password; repeatable. Gets access to every --database.
        #[arg(long = "user", value_parser = parse_user)]
        users: Vec<(String, String)>,

        /// Backup to restore from
        #[arg(long)]
        backup: Option<String>,

        #[arg(long)]
        availability_zone: Option<String>,

        /// Datastore type, e.g. mysql
        #[arg(long)]
        datastore: Option<String>,

        #[arg(long)]
        datastore_version: Option<String>,

        /// Network interface as JSON, e.g. '{"net-id": "..."}'; repeatable
        #[arg(long = "nic")]
        nics: Vec<String>,

        /// Configuration group to attach
        #[arg(long)]
        configuration: Option<String>,

        /// Create as a replica of this instance
        #[arg(long)]
        replica_of: Option<String>,
    },

    /// Rename an instance or change its configuration group
    Update {
        instance: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Configuration group to attach
        #[arg(long, conflicts_with = "remove_configuration")]
        configuration: Option<String>,

        /// Detach the current configuration group
        #[arg(long)]
        remove_configuration: bool,
    },

    /// Delete an instance
    #[command(visible_alias = "rm")]
    Delete { instance: String },

    /// Restart the database service
    Restart { instance: String },

    /// Grow the data volume
    ResizeVolume {
        instance: String,

        /// New size in GB
        size: u32,
    },

    /// Move the instance to another flavor
    ResizeFlavor {
        instance: String,

        /// Flavor ID or name
        flavor: String,
    },

    /// Attach a configuration group
    AttachConfiguration {
        instance: String,

        /// Configuration group ID or name
        configuration: String,
    },

    /// Detach the configuration group
    DetachConfiguration { instance: String },

    /// Show the effective configuration values
    Configuration { instance: String },

    /// List backups of an instance
    Backups {
        instance: String,

        #[command(flatten)]
        page: PageArgs,
    },
}

fn parse_user(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((name, password)) if !name.is_empty() => Ok((name.to_string(), password.to_string())),
        _ => Err(format!("expected name:password, got '{}'", s)),
    }
}

/// Database commands
#[derive(Subcommand, Debug)]
pub enum DatabaseCommands {
    /// List databases of an instance
    #[command(visible_alias = "ls")]
    List {
        instance: String,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Create one or more databases
    Create {
        instance: String,

        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Delete a database
    #[command(visible_alias = "rm")]
    Delete { instance: String, name: String },
}

/// User commands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List users of an instance
    #[command(visible_alias = "ls")]
    List {
        instance: String,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show a user
    #[command(visible_alias = "get")]
    Show {
        instance: String,
        name: String,

        /// Host the user connects from
        #[arg(long)]
        host: Option<String>,
    },

    /// Create a user
    Create {
        instance: String,
        name: String,
        password: String,

        #[arg(long)]
        host: Option<String>,

        /// Database the user can access; repeatable
        #[arg(long = "database")]
        databases: Vec<String>,
    },

    /// Delete a user
    #[command(visible_alias = "rm")]
    Delete {
        instance: String,
        name: String,

        #[arg(long)]
        host: Option<String>,
    },

    /// Change a user's name, password or host
    Update {
        instance: String,
        name: String,

        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        new_name: Option<String>,

        #[arg(long)]
        new_password: Option<String>,

        #[arg(long)]
        new_host: Option<String>,
    },

    /// Set a user's password
    ChangePassword {
        instance: String,
        name: String,
        password: String,

        #[arg(long)]
        host: Option<String>,
    },

    /// Grant access to databases
    Grant {
        instance: String,
        name: String,

        #[arg(required = true)]
        databases: Vec<String>,

        #[arg(long)]
        host: Option<String>,
    },

    /// Revoke access to a database
    Revoke {
        instance: String,
        name: String,
        database: String,

        #[arg(long)]
        host: Option<String>,
    },

    /// List the databases a user can access
    Access {
        instance: String,
        name: String,

        #[arg(long)]
        host: Option<String>,
    },
}

/// Root user commands
#[derive(Subcommand, Debug)]
pub enum RootCommands {
    /// Enable root and print its generated password
    Enable { instance: String },

    /// Show whether root has ever been enabled
    Show { instance: String },
}

/// Flavor commands
#[derive(Subcommand, Debug)]
pub enum FlavorCommands {
    #[command(visible_alias = "ls")]
    List,

    #[command(visible_alias = "get")]
    Show {
        /// Flavor ID or name
        flavor: String,
    },
}

/// Backup commands
#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,
    },

    #[command(visible_alias = "get")]
    Show {
        /// Backup ID or name
        backup: String,
    },

    /// Back up an instance
    Create {
        /// Instance to back up
        instance: String,

        /// Name of the backup
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    #[command(visible_alias = "rm")]
    Delete { backup: String },
}

/// Configuration group commands
#[derive(Subcommand, Debug)]
pub enum ConfigurationCommands {
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,
    },

    #[command(visible_alias = "get")]
    Show { configuration: String },

    /// Create a configuration group
    #[command(after_help = "EXAMPLES:
    trovectl configuration create tuned '{\"max_connections\": 200}' --datastore mysql
    trovectl configuration create tuned @values.json
")]
    Create {
        name: String,

        /// Values as a JSON object (or @file)
        values: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        datastore: Option<String>,

        #[arg(long)]
        datastore_version: Option<String>,
    },

    /// Replace all values of a configuration group
    Update {
        configuration: String,

        /// Values as a JSON object (or @file)
        values: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Merge values into a configuration group
    Patch {
        configuration: String,

        /// Values as a JSON object (or @file)
        values: String,
    },

    #[command(visible_alias = "rm")]
    Delete { configuration: String },

    /// List instances using a configuration group
    Instances {
        configuration: String,

        #[command(flatten)]
        page: PageArgs,
    },

    /// List the parameters a datastore version accepts
    Parameters { datastore: String, version: String },

    /// Show one parameter of a datastore version
    Parameter {
        datastore: String,
        version: String,
        name: String,
    },
}

/// Datastore commands
#[derive(Subcommand, Debug)]
pub enum DatastoreCommands {
    #[command(visible_alias = "ls")]
    List,

    #[command(visible_alias = "get")]
    Show { datastore: String },

    /// List versions of a datastore
    Versions { datastore: String },

    /// Show a datastore version; omit the datastore to look the version up by ID
    VersionShow {
        version: String,

        #[arg(long)]
        datastore: Option<String>,
    },

    /// Tenants allowed to use a private datastore version
    #[command(subcommand)]
    Member(DatastoreMemberCommands),
}

#[derive(Subcommand, Debug)]
pub enum DatastoreMemberCommands {
    #[command(visible_alias = "ls")]
    List { datastore: String, version: String },

    Add {
        datastore: String,
        version: String,
        tenant: String,
    },

    #[command(visible_alias = "rm")]
    Delete {
        datastore: String,
        version: String,
        member: String,
    },
}

/// Limit commands
#[derive(Subcommand, Debug)]
pub enum LimitCommands {
    #[command(visible_alias = "ls")]
    List,
}

/// Management commands
#[derive(Subcommand, Debug)]
pub enum MgmtCommands {
    /// Instance administration across tenants
    #[command(subcommand)]
    Instance(MgmtInstanceCommands),

    /// Create a flavor
    FlavorCreate {
        name: String,

        /// Memory in MB
        #[arg(long)]
        ram: u32,

        /// Disk in GB
        #[arg(long)]
        disk: u32,

        #[arg(long)]
        vcpus: u32,

        /// Flavor ID; the service picks one when omitted
        #[arg(long)]
        flavor_id: Option<String>,

        #[arg(long)]
        ephemeral: Option<u32>,

        #[arg(long)]
        swap: Option<u32>,

        #[arg(long)]
        rxtx_factor: Option<String>,

        #[arg(long)]
        service_type: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MgmtInstanceCommands {
    #[command(visible_alias = "ls")]
    List {
        /// Only deleted (true) or only live (false) instances
        #[arg(long)]
        deleted: Option<bool>,

        #[command(flatten)]
        page: PageArgs,
    },

    #[command(visible_alias = "get")]
    Show { instance: String },

    /// When root was enabled, and by whom
    RootHistory { instance: String },

    Stop { instance: String },

    /// Reboot the underlying server
    Reboot { instance: String },

    /// Move the instance to another compute host
    Migrate {
        instance: String,

        #[arg(long)]
        host: Option<String>,
    },

    /// Update the guest agent
    Update { instance: String },

    ResetTaskStatus { instance: String },
}
