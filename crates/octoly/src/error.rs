//! CLI error types with miette diagnostics.
//!
//! Failures coming out of a command lifecycle arrive as `ErrorRecord`s;
//! they keep their stable identifier and pick up help text and an exit
//! code from their `ErrorKind`.

use miette::Diagnostic;
use thiserror::Error;

use octoly_config::ConfigError;
use octoly_core::{ErrorKind, ErrorRecord, Fatal};

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
    /// 128 + SIGINT
    pub const CANCELLED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Command failures ─────────────────────────────────────────────
    #[error("{message} [{id}]")]
    #[diagnostic(code(octoly::command_failed))]
    CommandFailed {
        /// Stable identifier, e.g. `GetAccount-NotFound`.
        id: String,
        kind: ErrorKind,
        message: String,
        #[help]
        help: Option<String>,
    },

    // ── Credentials ──────────────────────────────────────────────────
    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(octoly::no_credentials),
        help(
            "Store an API key with: octoly config set-api-key --profile {profile}\n\
             Or pass --api-key / set OCTOPUS_API_KEY."
        )
    )]
    NoCredentials { profile: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(octoly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: octoly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No server configured")]
    #[diagnostic(
        code(octoly::no_config),
        help(
            "Create a profile with: octoly config init\n\
             Expected at: {path}\n\
             Or pass --server and --api-key."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(octoly::config))]
    Config(ConfigError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(octoly::validation))]
    Validation { field: String, reason: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' changes the server and requires confirmation")]
    #[diagnostic(
        code(octoly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(octoly::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(octoly::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { kind, .. } => kind_exit_code(*kind),
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. }
            | Self::Json(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

fn kind_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Authentication => exit_code::AUTH,
        ErrorKind::PermissionDenied => exit_code::PERMISSION,
        ErrorKind::Connection => exit_code::CONNECTION,
        ErrorKind::Timeout => exit_code::TIMEOUT,
        ErrorKind::NotFound => exit_code::NOT_FOUND,
        ErrorKind::Conflict => exit_code::CONFLICT,
        ErrorKind::Configuration | ErrorKind::Validation => exit_code::USAGE,
        ErrorKind::Cancelled => exit_code::CANCELLED,
        ErrorKind::ProtocolViolation | ErrorKind::Api | ErrorKind::Internal => exit_code::GENERAL,
    }
}

fn kind_help(kind: ErrorKind) -> Option<String> {
    let help = match kind {
        ErrorKind::Authentication => {
            "Verify the API key for this server.\n\
             Store a new one with: octoly config set-api-key"
        }
        ErrorKind::PermissionDenied => "The API key's user lacks permission for this operation.",
        ErrorKind::Connection => {
            "Check that the server URL is reachable.\n\
             Use --insecure (-k) for self-signed certificates."
        }
        ErrorKind::Timeout => "Increase the timeout with --timeout.",
        ErrorKind::NotFound => "Use `get --all` to see what exists in the space.",
        ErrorKind::Conflict => "Choose another name, or update the existing resource.",
        ErrorKind::Configuration => {
            "Select with exactly one of --all, --name, --names, --first or --many."
        }
        ErrorKind::Validation => "Check the resource document and try again.",
        ErrorKind::Cancelled
        | ErrorKind::ProtocolViolation
        | ErrorKind::Api
        | ErrorKind::Internal => return None,
    };
    Some(help.to_owned())
}

// ── Lifecycle → CliError mapping ─────────────────────────────────────

impl From<ErrorRecord> for CliError {
    fn from(record: ErrorRecord) -> Self {
        Self::CommandFailed {
            help: kind_help(record.kind),
            message: record.to_string(),
            kind: record.kind,
            id: record.id,
        }
    }
}

/// Terminating failures are marked so they read differently from an
/// ordinary reported error.
impl From<Fatal> for CliError {
    fn from(fatal: Fatal) -> Self {
        let record = fatal.into_record();
        Self::CommandFailed {
            help: kind_help(record.kind),
            message: format!("fatal: {record}"),
            kind: record.kind,
            id: record.id,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
