// ── Core error types ──
//
// Resource-level errors from fmgdevice-core. Consumers never see HTTP
// status codes or JSON-RPC envelopes directly: the
// `From<fmgdevice_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to FortiManager at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── Object errors ────────────────────────────────────────────────
    #[error("Object not found: {url}")]
    NotFound { url: String },

    #[error("Object already exists: {url}")]
    AlreadyExists { url: String },

    #[error("Permission denied for {url}")]
    PermissionDenied { url: String },

    // ── Resource definition / state errors ───────────────────────────
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    #[error("Missing path parameter '{name}' for {resource}")]
    MissingParameter { name: String, resource: String },

    #[error("Cannot expand {path}: {reason}")]
    Expand { path: String, reason: String },

    #[error("Cannot flatten {path}: {reason}")]
    Flatten { path: String, reason: String },

    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A CRUD call failed; `context` names the operation and resource.
    #[error("{context}: {source}")]
    Operation {
        context: String,
        #[source]
        source: Box<CoreError>,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// FortiManager JSON-RPC status code, when there is one.
        code: Option<i64>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap an error with a static operation context.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Operation {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping `Operation` wrappers.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fmgdevice_api::Error> for CoreError {
    fn from(err: fmgdevice_api::Error) -> Self {
        use fmgdevice_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- re-authentication required".into(),
            },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Http { status, body } => CoreError::Api {
                message: format!("HTTP {status}: {body}"),
                code: None,
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::ObjectNotFound { url } => CoreError::NotFound { url },
            ApiError::ObjectExists { url } => CoreError::AlreadyExists { url },
            ApiError::PermissionDenied { url } => CoreError::PermissionDenied { url },
            ApiError::Api { code, message, url } => CoreError::Api {
                message: format!("{message} ({url})"),
                code: Some(code),
            },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            ApiError::UnexpectedResponse(message) => CoreError::Internal(message),
        }
    }
}
