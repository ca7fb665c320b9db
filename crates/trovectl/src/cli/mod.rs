//! CLI structure and command definitions
//!
//! Defines the command-line interface using clap in two layers:
//! 1. Raw API access (`api` command)
//! 2. Human-friendly resource commands (`instance`, `backup`, ...)

use clap::{Parser, Subcommand};

pub mod trove;

pub use trove::*;

/// Command line client for the Trove Database-as-a-Service API
#[derive(Parser, Debug)]
#[command(name = "trovectl")]
#[command(version, about = "Command line client for the Trove Database-as-a-Service API")]
#[command(long_about = "
Command line client for the Trove Database-as-a-Service API

Instances, flavors and configuration groups can be named by ID, unique ID
prefix or name.

EXAMPLES:
    # Set up a profile
    trovectl profile set prod --url https://trove.example.com:8779/v1.0/<tenant> --token <token>

    # List instances as a table
    trovectl instance list

    # Create an instance with a 2GB volume and one database
    trovectl instance create orders --flavor m1.small --size 2 --database orders

    # Get JSON output for scripting, filtered with JMESPath
    trovectl instance list -o json -q '[?status==`ACTIVE`].name'

    # Direct API access
    trovectl api get /instances

For more help on a specific command, run:
    trovectl <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "TROVECTL_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "TROVECTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// JMESPath query to filter output
    #[arg(long, short = 'q', global = true)]
    pub query: Option<String>,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table for resource commands, JSON for raw API calls
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table format
    Table,
}

impl OutputFormat {
    /// Replace `auto` with the command's preferred format
    pub fn resolve(self, auto: crate::output::OutputFormat) -> crate::output::OutputFormat {
        match self {
            OutputFormat::Auto => auto,
            OutputFormat::Json => crate::output::OutputFormat::Json,
            OutputFormat::Yaml => crate::output::OutputFormat::Yaml,
            OutputFormat::Table => crate::output::OutputFormat::Table,
        }
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Raw API access - direct REST endpoint calls
    #[command(after_help = "EXAMPLES:
    # GET request
    trovectl api get /instances

    # POST request with JSON data
    trovectl api post /instances/<id>/action --data '{\"restart\": {}}'

    # PUT request from file
    trovectl api put /configurations/<id> --data @values.json
")]
    Api {
        /// HTTP method
        #[arg(value_parser = parse_http_method)]
        method: HttpMethod,

        /// Path relative to the profile endpoint (e.g., /instances)
        path: String,

        /// Request body (JSON string or @file)
        #[arg(long)]
        data: Option<String>,
    },

    /// Profile management
    #[command(subcommand, visible_alias = "prof")]
    Profile(ProfileCommands),

    /// Database instances
    #[command(subcommand, visible_alias = "inst")]
    Instance(InstanceCommands),

    /// Databases inside an instance
    #[command(subcommand, visible_alias = "db")]
    Database(DatabaseCommands),

    /// Users of an instance
    #[command(subcommand)]
    User(UserCommands),

    /// Root user of an instance
    #[command(subcommand)]
    Root(RootCommands),

    /// Instance flavors
    #[command(subcommand)]
    Flavor(FlavorCommands),

    /// Instance backups
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Configuration groups
    #[command(subcommand, visible_alias = "config")]
    Configuration(ConfigurationCommands),

    /// Datastores and their versions
    #[command(subcommand)]
    Datastore(DatastoreCommands),

    /// Rate and absolute limits
    #[command(subcommand)]
    Limit(LimitCommands),

    /// Operator-only management commands
    #[command(subcommand)]
    Mgmt(MgmtCommands),

    /// Print identifiers recorded in the completion cache
    #[command(name = "complete-ids", hide = true)]
    CompleteIds {
        /// Resource category, e.g. instance or backup
        category: String,

        /// Print human-readable names instead of UUIDs
        #[arg(long)]
        names: bool,
    },

    /// Version information
    #[command(visible_alias = "ver")]
    Version,

    /// Generate shell completions
    #[command(visible_alias = "comp")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell", alias = "power-shell")]
    PowerShell,
    Elvish,
}

/// HTTP methods for raw API access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Parse HTTP method case-insensitively
fn parse_http_method(s: &str) -> Result<HttpMethod, String> {
    match s.to_lowercase().as_str() {
        "get" => Ok(HttpMethod::Get),
        "post" => Ok(HttpMethod::Post),
        "put" => Ok(HttpMethod::Put),
        "patch" => Ok(HttpMethod::Patch),
        "delete" => Ok(HttpMethod::Delete),
        _ => Err(format!(
            "invalid HTTP method: {} (valid: get, post, put, patch, delete)",
            s
        )),
    }
}

impl From<HttpMethod> for trovectl_core::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => trovectl_core::Method::GET,
            HttpMethod::Post => trovectl_core::Method::POST,
            HttpMethod::Put => trovectl_core::Method::PUT,
            HttpMethod::Patch => trovectl_core::Method::PATCH,
            HttpMethod::Delete => trovectl_core::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Put => write!(f, "PUT"),
            HttpMethod::Patch => write!(f, "PATCH"),
            HttpMethod::Delete => write!(f, "DELETE"),
        }
    }
}

/// Profile management commands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List all configured profiles
    #[command(visible_alias = "ls")]
    List,

    /// Show the path to the configuration file
    Path,

    /// Show details of a specific profile
    #[command(visible_alias = "get")]
    Show {
        /// Profile name to show
        name: String,
    },

    /// Set or create a profile
    #[command(visible_alias = "add")]
    #[command(after_help = "EXAMPLES:
    # Create a profile with a token
    trovectl profile set prod \\
        --url https://trove.example.com:8779/v1.0/3f1a... \\
        --token gAAAAABk...

    # Prompt for the token instead of passing it on the command line
    trovectl profile set prod --url https://trove.example.com:8779/v1.0/3f1a... --prompt-token

    # Local devstack with a self-signed certificate
    trovectl profile set dev --url https://localhost:8779/v1.0/admin --insecure --default
")]
    Set {
        /// Profile name
        name: String,

        /// Versioned, tenant-scoped Trove endpoint
        #[arg(long)]
        url: String,

        /// Auth token sent as X-Auth-Token
        #[arg(long, conflicts_with = "prompt_token")]
        token: Option<String>,

        /// Read the token from the terminal without echoing it
        #[arg(long)]
        prompt_token: bool,

        /// Accept invalid TLS certificates
        #[arg(long)]
        insecure: bool,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Region name, informational
        #[arg(long)]
        region: Option<String>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,

        /// Store the token in the OS keyring instead of the config file
        #[cfg(feature = "secure-storage")]
        #[arg(long)]
        use_keyring: bool,
    },

    /// Remove a profile
    #[command(visible_alias = "rm")]
    Remove {
        /// Profile name to remove
        name: String,
    },

    /// Set the default profile
    Default {
        /// Profile name to use by default
        name: String,
    },
}
