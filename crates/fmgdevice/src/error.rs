//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use fmgdevice_config::ConfigError;
use fmgdevice_core::CoreError;

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
    #[error("Could not connect to FortiManager at {url}")]
    #[diagnostic(
        code(fmgdevice::connection_failed),
        help(
            "Check that FortiManager is reachable and the URL is correct.\n\
             Self-signed certificate? Try: fmgdevice status --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(fmgdevice::timeout),
        help("Increase timeout with --timeout or check FortiManager responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fmgdevice::auth_failed),
        help(
            "Verify your API token or username/password.\n\
             Run: fmgdevice config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(fmgdevice::no_credentials),
        help(
            "Configure credentials with: fmgdevice config init\n\
             Or set the FMG_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Objects ──────────────────────────────────────────────────────
    #[error("{context}object not found: {url}")]
    #[diagnostic(code(fmgdevice::not_found))]
    NotFound { context: String, url: String },

    #[error("{context}object already exists: {url}")]
    #[diagnostic(
        code(fmgdevice::conflict),
        help("Import the existing object instead: fmgdevice import <RESOURCE> <KEY>")
    )]
    Conflict { context: String, url: String },

    #[error("{context}permission denied for {url}")]
    #[diagnostic(
        code(fmgdevice::permission_denied),
        help("Check the administrator profile's read-write access for this ADOM.")
    )]
    PermissionDenied { context: String, url: String },

    #[error("{context}{message}")]
    #[diagnostic(code(fmgdevice::api_error))]
    ApiError {
        context: String,
        message: String,
        code: Option<i64>,
    },

    // ── Resources & conversion ───────────────────────────────────────
    #[error("Unknown resource type '{name}'")]
    #[diagnostic(
        code(fmgdevice::unknown_resource),
        help("Run: fmgdevice resources list")
    )]
    UnknownResource { name: String },

    #[error("{context}missing path parameter '{name}' for {resource}")]
    #[diagnostic(
        code(fmgdevice::missing_parameter),
        help(
            "Set it in the state file, or pass --device / --vdom, or set\n\
             device_name / device_vdom on the profile."
        )
    )]
    MissingParameter {
        context: String,
        name: String,
        resource: String,
    },

    #[error("{context}{message}")]
    #[diagnostic(
        code(fmgdevice::conversion),
        help("Check the offending attribute against: fmgdevice resources schema <RESOURCE>")
    )]
    Conversion { context: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fmgdevice::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fmgdevice::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fmgdevice config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No FortiManager configured")]
    #[diagnostic(
        code(fmgdevice::no_config),
        help(
            "Create a profile with: fmgdevice config init\n\
             Or pass --url and --token. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(fmgdevice::config))]
    Config(String),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' was not confirmed")]
    #[diagnostic(
        code(fmgdevice::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NotConfirmed { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(fmgdevice::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::Validation { .. }
            | Self::UnknownResource { .. }
            | Self::MissingParameter { .. }
            | Self::Conversion { .. }
            | Self::NotConfirmed { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        from_core(err, String::new())
    }
}

/// `context` is the accumulated operation prefix (`"error creating X resource: "`).
fn from_core(err: CoreError, context: String) -> CliError {
    match err {
        CoreError::Operation { context: outer, source } => {
            from_core(*source, format!("{context}{outer}: "))
        }

        CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
        CoreError::Timeout => CliError::Timeout,
        CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

        CoreError::NotFound { url } => CliError::NotFound { context, url },
        CoreError::AlreadyExists { url } => CliError::Conflict { context, url },
        CoreError::PermissionDenied { url } => CliError::PermissionDenied { context, url },

        CoreError::UnknownResource(name) => CliError::UnknownResource { name },
        CoreError::MissingParameter { name, resource } => CliError::MissingParameter {
            context,
            name,
            resource,
        },

        e @ (CoreError::Expand { .. } | CoreError::Flatten { .. }) => CliError::Conversion {
            context,
            message: e.to_string(),
        },

        CoreError::Validation { field, reason } => CliError::Validation { field, reason },

        CoreError::Api { message, code } => CliError::ApiError {
            context,
            message,
            code,
        },

        CoreError::Config { message } => CliError::Config(message),
        CoreError::Internal(message) => CliError::Internal(message),
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other.to_string()),
        }
    }
}
