//! Error types for trovectl
//!
//! Library errors are folded into [`TroveCtlError`] so every failure can be
//! printed as a diagnostic with tips for fixing it.

use colored::Colorize;
use thiserror::Error;
use trovectl_core::{ApiError, config::ConfigError};

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: Profile 'prod' not found
///
///   tip: List available profiles: trovectl profile list
/// ```
pub struct CliDiagnostic {
    message: String,
    tips: Vec<String>,
}

impl CliDiagnostic {
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            tips: Vec::new(),
        }
    }

    pub fn tip(mut self, description: &str) -> Self {
        self.tips.push(description.to_string());
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        for tip in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", tip);
        }
    }
}

/// Main error type for the trovectl application
#[derive(Error, Debug)]
pub enum TroveCtlError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No profile configured. Use 'trovectl profile set' or set TROVE_URL.")]
    NoProfileConfigured,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Ambiguous { message: String },

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("File error for '{path}': {message}")]
    FileError { path: String, message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for trovectl operations
pub type Result<T> = std::result::Result<T, TroveCtlError>;

impl TroveCtlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            TroveCtlError::ProfileNotFound { name } => vec![
                "List available profiles: trovectl profile list".to_string(),
                format!(
                    "Create profile '{}': trovectl profile set {} --url <endpoint>",
                    name, name
                ),
            ],
            TroveCtlError::NoProfileConfigured => vec![
                "Create a profile: trovectl profile set <name> --url https://trove:8779/v1.0/<tenant> --token <token>".to_string(),
                "Or export TROVE_URL and TROVE_TOKEN".to_string(),
            ],
            TroveCtlError::AuthenticationFailed { .. } => vec![
                "Check the token of the profile: trovectl profile show <profile>".to_string(),
                "Tokens expire; fetch a new one and run 'trovectl profile set' again".to_string(),
            ],
            TroveCtlError::ConnectionError { message }
                if message.contains("certificate") || message.contains("SSL") =>
            {
                vec![
                    "Allow self-signed certificates: trovectl profile set <name> --url <endpoint> --insecure".to_string(),
                    "Check that the endpoint URL is correct and reachable".to_string(),
                ]
            }
            TroveCtlError::ConnectionError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify the endpoint URL: trovectl profile show <profile>".to_string(),
            ],
            TroveCtlError::NotFound { .. } => vec![
                "List the resources to find the correct name or ID".to_string(),
                "Check that you're using the correct profile".to_string(),
            ],
            TroveCtlError::Ambiguous { .. } => {
                vec!["Use the full ID instead of the name".to_string()]
            }
            TroveCtlError::InvalidInput { .. } => {
                vec!["Check the command syntax: trovectl <command> --help".to_string()]
            }
            TroveCtlError::FileError { path, .. } => vec![
                format!("Check that file exists: {}", path),
                "Verify file permissions are correct".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion);
        }

        diag.print();
    }
}

impl From<ApiError> for TroveCtlError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { message } => TroveCtlError::AuthenticationFailed { message },
            ApiError::Transport(e) if e.is_connect() || e.is_timeout() => {
                TroveCtlError::ConnectionError {
                    message: e.to_string(),
                }
            }
            ApiError::Command(message) if message.starts_with("Multiple ") => {
                TroveCtlError::Ambiguous { message }
            }
            ApiError::Command(message) if message.starts_with("No ") => {
                TroveCtlError::NotFound { message }
            }
            ApiError::NotFound { message } => TroveCtlError::NotFound { message },
            _ => TroveCtlError::ApiError {
                message: err.to_string(),
            },
        }
    }
}

impl From<ConfigError> for TroveCtlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => TroveCtlError::ProfileNotFound { name },
            ConfigError::NoProfiles { .. } => TroveCtlError::NoProfileConfigured,
            other => TroveCtlError::Configuration(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for TroveCtlError {
    fn from(err: serde_json::Error) -> Self {
        TroveCtlError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<std::io::Error> for TroveCtlError {
    fn from(err: std::io::Error) -> Self {
        TroveCtlError::OutputError {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<anyhow::Error> for TroveCtlError {
    fn from(err: anyhow::Error) -> Self {
        TroveCtlError::InvalidInput {
            message: format!("{:#}", err),
        }
    }
}
