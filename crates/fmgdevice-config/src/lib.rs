//! Shared configuration for fmgdevice.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `fmgdevice_core::ProviderConfig`. The CLI layers
//! its flag overrides on top of this.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fmgdevice_core::{Credentials, ProviderConfig, TlsMode, WorkspaceMode};

/// Keyring service name for stored secrets.
pub const KEYRING_SERVICE: &str = "fmgdevice";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named FortiManager profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named FortiManager profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// FortiManager base URL (e.g., "https://fmg.example.net").
    pub url: String,

    /// Auth mode: "session" or "token".
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,

    /// Username for session auth.
    pub username: Option<String>,

    /// Password for session auth (plaintext, prefer keyring).
    pub password: Option<String>,

    /// API token (plaintext, prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    pub token_env: Option<String>,

    /// ADOM used for workspace locking.
    pub adom: Option<String>,

    /// Default managed device.
    pub device_name: Option<String>,

    #[serde(default = "default_vdom")]
    pub device_vdom: String,

    #[serde(default)]
    pub workspace_mode: WorkspaceMode,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Retries on transient failures.
    pub retries: Option<u32>,
}

impl Profile {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_mode: default_auth_mode(),
            username: None,
            password: None,
            token: None,
            token_env: None,
            adom: None,
            device_name: None,
            device_vdom: default_vdom(),
            workspace_mode: WorkspaceMode::default(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            retries: None,
        }
    }
}

fn default_auth_mode() -> String {
    "token".into()
}
fn default_vdom() -> String {
    "root".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "fmgdevice", "fmgdevice").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("fmgdevice");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file. `FMG_`-prefixed env vars override it,
/// with `__` separating nested keys (`FMG_DEFAULTS__TIMEOUT=60`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FMG_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_secret(profile_name: &str, kind: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}")).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

/// Store a secret in the system keyring under `{profile}/{kind}`.
pub fn store_secret(profile_name: &str, kind: &str, secret: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}"))
        .and_then(|entry| entry.set_password(secret))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

/// Resolve an API token from the credential chain (no CLI flag step).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env, then FMG_TOKEN
    let env_names = profile.token_env.iter().map(String::as_str).chain(["FMG_TOKEN"]);
    for env_name in env_names {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Some(secret) = keyring_secret(profile_name, "token") {
        return Ok(secret);
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve session credentials (username + password) without CLI flags.
pub fn resolve_session_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("FMG_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 1. Env var
    if let Ok(pw) = std::env::var("FMG_PASSWORD") {
        return Ok((username, SecretString::from(pw)));
    }

    // 2. Keyring
    if let Some(pw) = keyring_secret(profile_name, "password") {
        return Ok((username, pw));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve `Credentials` from a profile's `auth_mode` field.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<Credentials, ConfigError> {
    match profile.auth_mode.as_str() {
        "token" => Ok(Credentials::ApiToken {
            token: resolve_token(profile, profile_name)?,
        }),
        "session" => {
            let (username, password) = resolve_session_credentials(profile, profile_name)?;
            Ok(Credentials::Session { username, password })
        }
        other => Err(ConfigError::Validation {
            field: "auth_mode".into(),
            reason: format!("expected 'session' or 'token', got '{other}'"),
        }),
    }
}

/// TLS mode for a profile. `insecure` falls back to `[defaults]`, and
/// a configured CA beats the system roots.
pub fn profile_tls(profile: &Profile, defaults: &Defaults) -> TlsMode {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    }
}

/// Build a `ProviderConfig` from a profile, without CLI flag overrides.
///
/// Settings the profile leaves unset come from `defaults`.
pub fn profile_to_provider_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ProviderConfig, ConfigError> {
    let url: url::Url = profile.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", profile.url),
    })?;

    let credentials = resolve_auth(profile, profile_name)?;

    let mut config = ProviderConfig::new(url, credentials).with_vdom(profile.device_vdom.clone());
    config.tls = profile_tls(profile, defaults);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.device_name.clone_from(&profile.device_name);
    config.adom.clone_from(&profile.adom);
    config.workspace_mode = profile.workspace_mode;
    if let Some(retries) = profile.retries {
        config.retries = retries;
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "lab"

[defaults]
output = "json"

[profiles.lab]
url = "https://fmg.lab.example"
auth_mode = "token"
token = "plain-token"
adom = "root"
device_name = "fgt-lab"
workspace_mode = "normal"
retries = 3
"#;

    fn write_sample(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn loads_profiles_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 30);

        let lab = &cfg.profiles["lab"];
        assert_eq!(lab.device_vdom, "root");
        assert_eq!(lab.workspace_mode, WorkspaceMode::Normal);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut profile = Profile::new("https://fmg.example");
        profile.device_name = Some("fgt1".into());
        cfg.profiles.insert("default".into(), profile);
        save_config_to(&cfg, &path).unwrap();

        let back = load_config_from(&path).unwrap();
        assert_eq!(back.profiles["default"].device_name.as_deref(), Some("fgt1"));
    }

    #[test]
    fn profile_translates_to_provider_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();
        let mut lab = cfg.profiles["lab"].clone();
        lab.token_env = Some("FMGDEVICE_TEST_UNSET_TOKEN_VAR".into());

        let provider = profile_to_provider_config(&lab, "lab-test-profile", &cfg.defaults).unwrap();
        assert_eq!(provider.url.as_str(), "https://fmg.lab.example/");
        assert_eq!(provider.device_name.as_deref(), Some("fgt-lab"));
        assert_eq!(provider.adom.as_deref(), Some("root"));
        assert_eq!(provider.workspace_mode, WorkspaceMode::Normal);
        assert_eq!(provider.retries, 3);
        assert!(matches!(provider.credentials, Credentials::ApiToken { .. }));
    }

    #[test]
    fn plaintext_token_is_the_last_resort() {
        let mut profile = Profile::new("https://fmg.example");
        profile.token = Some("from-file".into());
        profile.token_env = Some("FMGDEVICE_TEST_UNSET_TOKEN_VAR".into());
        if std::env::var("FMG_TOKEN").is_err() {
            let token = resolve_token(&profile, "unit-test-no-keyring").unwrap();
            assert_eq!(token.expose_secret(), "from-file");
        }
    }

    #[test]
    fn unknown_auth_mode_is_rejected() {
        let mut profile = Profile::new("https://fmg.example");
        profile.auth_mode = "oauth".into();
        assert!(matches!(
            resolve_auth(&profile, "x"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn tls_verifies_against_system_roots_by_default() {
        let mut profile = Profile::new("https://fmg.example");
        profile.insecure = Some(false);
        let defaults = Defaults::default();
        assert!(matches!(profile_tls(&profile, &defaults), TlsMode::System));

        profile.insecure = None;
        assert!(matches!(profile_tls(&profile, &defaults), TlsMode::System));

        profile.ca_cert = Some(PathBuf::from("/etc/fmg/ca.pem"));
        assert!(matches!(profile_tls(&profile, &defaults), TlsMode::CustomCa(_)));

        profile.insecure = Some(true);
        assert!(matches!(
            profile_tls(&profile, &defaults),
            TlsMode::DangerAcceptInvalid
        ));
    }

    #[test]
    fn tls_insecure_falls_back_to_defaults() {
        let profile = Profile::new("https://fmg.example");
        let defaults = Defaults {
            insecure: true,
            ..Defaults::default()
        };
        assert!(matches!(
            profile_tls(&profile, &defaults),
            TlsMode::DangerAcceptInvalid
        ));
    }

    #[test]
    fn timeout_prefers_profile_then_defaults() {
        let mut profile = Profile::new("https://fmg.example");
        profile.token = Some("t".into());
        profile.token_env = Some("FMGDEVICE_TEST_UNSET_TOKEN_VAR".into());
        let defaults = Defaults {
            timeout: 90,
            ..Defaults::default()
        };

        let config = profile_to_provider_config(&profile, "timeout-test", &defaults).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(90));

        profile.timeout = Some(5);
        let config = profile_to_provider_config(&profile, "timeout-test", &defaults).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let mut profile = Profile::new("not a url");
        profile.token = Some("t".into());
        assert!(matches!(
            profile_to_provider_config(&profile, "x", &Defaults::default()),
            Err(ConfigError::Validation { ref field, .. }) if field == "url"
        ));
    }
}
