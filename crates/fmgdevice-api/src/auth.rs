use secrecy::SecretString;

/// Which authentication strategy a client uses.
///
/// Marker enum (no data) -- the actual secrets live in [`Credentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Session token obtained from `exec sys/login/user`.
    Session,
    /// Long-lived API token sent as a bearer header.
    ApiToken,
}

/// Credentials for authenticating with FortiManager.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Username/password login. The returned session token is attached
    /// to every subsequent JSON-RPC request.
    Session {
        username: String,
        password: SecretString,
    },

    /// REST API admin token.
    /// Generated at: System Settings > Administrators > REST API Admin.
    ApiToken { token: SecretString },
}

impl Credentials {
    pub fn strategy(&self) -> AuthStrategy {
        match self {
            Self::Session { .. } => AuthStrategy::Session,
            Self::ApiToken { .. } => AuthStrategy::ApiToken,
        }
    }
}
