// FortiManager JSON-RPC client
//
// Wraps `reqwest::Client` with request-id allocation, session handling,
// envelope unwrapping, and transient-failure retries. Workspace and
// system endpoints are implemented as inherent methods in separate files
// to keep this module focused on transport mechanics.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::{AuthStrategy, Credentials};
use crate::error::Error;
use crate::jsonrpc::{Method, Param, Request, Response};
use crate::transport::TransportConfig;

const LOGIN_URL: &str = "/sys/login/user";
const LOGOUT_URL: &str = "/sys/logout";

/// Raw client for FortiManager's JSON-RPC endpoint.
///
/// All request methods return the unwrapped `data` member of the first
/// result -- the envelope and status block are stripped before the caller
/// sees it, and non-zero status codes become [`Error`] variants.
pub struct FmgClient {
    http: reqwest::Client,
    base_url: Url,
    endpoint: Url,
    strategy: AuthStrategy,
    /// Session token from `exec sys/login/user`. Unused with API tokens.
    session: RwLock<Option<String>>,
    next_id: AtomicU64,
    retries: AtomicU32,
    retry_pause: Duration,
}

impl FmgClient {
    /// Create a client from credentials and a `TransportConfig`.
    ///
    /// API-token credentials are installed as a default `Authorization`
    /// header. Session credentials still require a call to [`login`](Self::login).
    pub fn new(
        base_url: Url,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = match credentials {
            Credentials::ApiToken { token } => {
                let mut headers = HeaderMap::new();
                let mut value =
                    HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())).map_err(
                        |_| Error::Authentication {
                            message: "API token contains invalid header characters".into(),
                        },
                    )?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
                transport.build_client_with_headers(headers)?
            }
            Credentials::Session { .. } => transport.build_client()?,
        };

        let mut client = Self::with_client(http, base_url, credentials.strategy())?;
        client.retries = AtomicU32::new(transport.retries);
        client.retry_pause = transport.retry_pause;
        Ok(client)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        strategy: AuthStrategy,
    ) -> Result<Self, Error> {
        let endpoint = base_url.join("/jsonrpc")?;
        Ok(Self {
            http,
            base_url,
            endpoint,
            strategy,
            session: RwLock::new(None),
            next_id: AtomicU64::new(1),
            retries: AtomicU32::new(0),
            retry_pause: Duration::from_millis(500),
        })
    }

    /// The FortiManager base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn strategy(&self) -> AuthStrategy {
        self.strategy
    }

    /// Set how many times a transient failure is retried.
    pub fn set_retries(&self, retries: u32) {
        self.retries.store(retries, Ordering::Relaxed);
    }

    pub fn retries(&self) -> u32 {
        self.retries.load(Ordering::Relaxed)
    }

    /// Whether a session token is currently held.
    pub fn has_session(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn session_token(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store_session(&self, token: Option<String>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    // ── Session management ───────────────────────────────────────────

    /// Authenticate with username/password and keep the session token.
    ///
    /// `exec /sys/login/user` with `{"user": ..., "passwd": ...}`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        debug!(username, "logging in");
        let body = Request {
            id: self.allocate_id(),
            method: Method::Exec,
            params: vec![Param {
                url: LOGIN_URL.into(),
                data: Some(json!({
                    "user": username,
                    "passwd": password.expose_secret(),
                })),
            }],
            session: None,
            verbose: 1,
        };

        let response = self.send(&body).await?;
        let status = response
            .result
            .first()
            .map(|r| (r.status.code, r.status.message.clone()))
            .ok_or_else(|| Error::UnexpectedResponse("login returned no result".into()))?;

        if status.0 != 0 {
            return Err(Error::Authentication {
                message: format!("login failed ({}): {}", status.0, status.1),
            });
        }

        let token = response.session.ok_or_else(|| Error::Authentication {
            message: "login response did not include a session".into(),
        })?;
        self.store_session(Some(token));
        debug!("login successful");
        Ok(())
    }

    /// End the current session. A no-op when no session is held.
    ///
    /// `exec /sys/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        if !self.has_session() {
            return Ok(());
        }
        debug!("logging out");
        let result = self.exec(LOGOUT_URL, None).await;
        self.store_session(None);
        result.map(|_| ())
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub async fn get(&self, url: &str) -> Result<Option<Value>, Error> {
        self.call(Method::Get, url, None).await
    }

    pub async fn set(&self, url: &str, data: Value) -> Result<Option<Value>, Error> {
        self.call(Method::Set, url, Some(data)).await
    }

    pub async fn add(&self, url: &str, data: Value) -> Result<Option<Value>, Error> {
        self.call(Method::Add, url, Some(data)).await
    }

    pub async fn update(&self, url: &str, data: Value) -> Result<Option<Value>, Error> {
        self.call(Method::Update, url, Some(data)).await
    }

    pub async fn delete(&self, url: &str) -> Result<Option<Value>, Error> {
        self.call(Method::Delete, url, None).await
    }

    pub async fn exec(&self, url: &str, data: Option<Value>) -> Result<Option<Value>, Error> {
        self.call(Method::Exec, url, data).await
    }

    /// Issue one JSON-RPC call, retrying transient transport failures.
    ///
    /// Non-idempotent methods are only resent when the request never left
    /// the client; a timeout or gateway error may have been applied.
    pub async fn call(
        &self,
        method: Method,
        url: &str,
        data: Option<Value>,
    ) -> Result<Option<Value>, Error> {
        let retries = self.retries();
        let mut attempt = 0;
        loop {
            match self.call_once(method, url, data.as_ref()).await {
                Err(e) if attempt < retries && retryable(method, &e) => {
                    attempt += 1;
                    warn!(%method, url, attempt, error = %e, "transient failure, retrying");
                    tokio::time::sleep(self.retry_pause).await;
                }
                other => return other,
            }
        }
    }

    async fn call_once(
        &self,
        method: Method,
        url: &str,
        data: Option<&Value>,
    ) -> Result<Option<Value>, Error> {
        debug!(%method, url, "jsonrpc call");
        let body = Request {
            id: self.allocate_id(),
            method,
            params: vec![Param {
                url: url.to_owned(),
                data: data.cloned(),
            }],
            session: self.session_token(),
            verbose: 1,
        };

        let response = self.send(&body).await?;
        let result = response.result.into_iter().next().ok_or_else(|| {
            Error::UnexpectedResponse(format!("no result for {method} {url}"))
        })?;

        trace!(code = result.status.code, message = %result.status.message, "jsonrpc status");
        match result.status.code {
            0 => Ok(result.data),
            code => {
                let target = if result.url.is_empty() {
                    url.to_owned()
                } else {
                    result.url
                };
                Err(Error::from_status(code, result.status.message, target))
            }
        }
    }

    /// POST a request and parse the envelope; status codes are left to the caller.
    async fn send(&self, body: &Request) -> Result<Response, Error> {
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(match self.strategy {
                AuthStrategy::Session => Error::SessionExpired,
                AuthStrategy::ApiToken => Error::Authentication {
                    message: "API token rejected".into(),
                },
            });
        }

        let text = resp.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        let response: Response = serde_json::from_str(&text).map_err(|e| {
            let preview: String = text.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: text.clone(),
            }
        })?;

        if let Some(id) = response.id {
            if id != body.id {
                return Err(Error::UnexpectedResponse(format!(
                    "response id {id} does not match request id {}",
                    body.id
                )));
            }
        }

        Ok(response)
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

fn retryable(method: Method, error: &Error) -> bool {
    if method.is_idempotent() {
        error.is_transient()
    } else {
        error.is_unsent()
    }
}
