//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use labkeep_config::ConfigError;
use labkeep_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the lab service at {url}")]
    #[diagnostic(
        code(labkeep::connection_failed),
        help(
            "Check that the service is running and the URL is right.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try --insecure (-k) or set ca_cert in the profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(labkeep::timeout),
        help("Increase the timeout with --timeout or check the service's responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(labkeep::auth_failed),
        help(
            "Check your username and password, or sign in again with: labkeep login\n\
             A rejected access key means the profile's key is wrong: labkeep config set-access-key"
        )
    )]
    AuthFailed { message: String },

    #[error("Not signed in")]
    #[diagnostic(
        code(labkeep::not_signed_in),
        help("This command needs an account. Run: labkeep login")
    )]
    NotSignedIn,

    #[error("No access key configured for profile '{profile}'")]
    #[diagnostic(
        code(labkeep::no_access_key),
        help(
            "Configure it with: labkeep config set-access-key --profile {profile}\n\
             Or set the LABKEEP_ACCESS_KEY environment variable."
        )
    )]
    NoAccessKey { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(code(labkeep::not_found), help("Check the ID and try again."))]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(code(labkeep::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(labkeep::api_error))]
    Api { message: String, status: Option<u16> },

    #[error("Unexpected {entity} data from the service: {message}")]
    #[diagnostic(
        code(labkeep::invalid_data),
        help("The service returned a value this client does not understand.")
    )]
    InvalidData {
        entity: &'static str,
        message: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(labkeep::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(labkeep::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: labkeep config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(labkeep::no_config),
        help(
            "Create one with: labkeep config init\n\
             Expected at: {path}\n\
             Or pass --api-url and --access-key."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(labkeep::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(labkeep::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(labkeep::internal))]
    Internal(String),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotSignedIn | Self::NoAccessKey { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Api {
                status: Some(403), ..
            } => exit_code::PERMISSION,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::Authentication { message } => Self::AuthFailed { message },
            CoreError::NotSignedIn => Self::NotSignedIn,
            CoreError::Validation { field, reason } => Self::Validation {
                field: field.into(),
                reason,
            },
            CoreError::Conflict { message } => Self::Conflict { message },
            CoreError::NotFound { message } => Self::NotFound { message },
            CoreError::Api { message, status } => Self::Api { message, status },
            CoreError::InvalidData { entity, message } => Self::InvalidData { entity, message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Cancelled => {
                Self::Internal("view closed before the request finished".into())
            }
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoAccessKey { profile } => Self::NoAccessKey { profile },
            other => Self::Config(Box::new(other)),
        }
    }
}
