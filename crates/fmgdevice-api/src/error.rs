use thiserror::Error;

/// Top-level error type for the `fmgdevice-api` crate.
///
/// Covers transport, authentication, and JSON-RPC status failures.
/// `fmgdevice-core` maps these into resource-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, locked account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The session token was rejected by FortiManager.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-2xx HTTP response from the JSON-RPC endpoint.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── JSON-RPC status ─────────────────────────────────────────────
    /// `-3`: the addressed object does not exist.
    #[error("Object does not exist: {url}")]
    ObjectNotFound { url: String },

    /// `-2`: the object already exists.
    #[error("Object already exists: {url}")]
    ObjectExists { url: String },

    /// `-11`: the session lacks permission for the URL.
    #[error("No permission for the resource: {url}")]
    PermissionDenied { url: String },

    /// Any other non-zero status code.
    #[error("FortiManager error {code} at {url}: {message}")]
    Api {
        code: i64,
        message: String,
        url: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The response was well-formed JSON but did not match the request.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// Map a JSON-RPC status code into the matching variant.
    pub fn from_status(code: i64, message: String, url: String) -> Self {
        match code {
            -3 => Self::ObjectNotFound { url },
            -2 => Self::ObjectExists { url },
            -11 => Self::PermissionDenied { url },
            _ => Self::Api { code, message, url },
        }
    }

    /// Returns `true` if re-authenticating might resolve the error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionExpired)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Returns `true` if the request never reached FortiManager, so it is
    /// safe to resend whatever the method.
    pub fn is_unsent(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// Returns `true` if the addressed object does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ObjectNotFound { .. } => true,
            Self::Http { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The JSON-RPC status code, if this error carries one.
    pub fn status_code(&self) -> Option<i64> {
        match self {
            Self::ObjectNotFound { .. } => Some(-3),
            Self::ObjectExists { .. } => Some(-2),
            Self::PermissionDenied { .. } => Some(-11),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
