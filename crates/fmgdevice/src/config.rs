//! CLI configuration -- thin wrapper around `fmgdevice_config`.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--url, --token, --device, ...).

use std::time::Duration;

use secrecy::SecretString;

use fmgdevice_core::{Credentials, ProviderConfig, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use fmgdevice_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config, store_secret,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ProviderConfig` from the config file, active profile, and flags.
pub fn build_provider_config(global: &GlobalOpts) -> Result<ProviderConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    // No profile: build from flags / env alone.
    let url_str = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let token = global.token.as_ref().ok_or(CliError::NoCredentials {
        profile: profile_name,
    })?;

    let mut config = ProviderConfig::new(
        parse_url(url_str)?,
        Credentials::ApiToken {
            token: SecretString::from(token.clone()),
        },
    );
    config.tls = if global.insecure || cfg.defaults.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };
    config.timeout = Duration::from_secs(cfg.defaults.timeout);
    apply_flag_overrides(&mut config, global);
    Ok(config)
}

/// Translate a `Profile` + global flags into a `ProviderConfig`.
///
/// CLI flag overrides take priority over profile values, which take
/// priority over `[defaults]`.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ProviderConfig, CliError> {
    let mut profile = profile.clone();
    if let Some(ref url) = global.url {
        profile.url.clone_from(url);
    }
    if let Some(ref token) = global.token {
        profile.auth_mode = "token".into();
        profile.token = Some(token.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }

    let mut config = fmgdevice_config::profile_to_provider_config(&profile, profile_name, defaults)?;
    // An explicit --token beats env and keyring lookups.
    if let Some(ref token) = global.token {
        config.credentials = Credentials::ApiToken {
            token: SecretString::from(token.clone()),
        };
    }
    apply_flag_overrides(&mut config, global);
    Ok(config)
}

fn apply_flag_overrides(config: &mut ProviderConfig, global: &GlobalOpts) {
    if let Some(timeout) = global.timeout {
        config.timeout = Duration::from_secs(timeout);
    }
    if let Some(ref device) = global.device {
        config.device_name = Some(device.clone());
    }
    if let Some(ref vdom) = global.vdom {
        config.device_vdom.clone_from(vdom);
    }
    if let Some(ref adom) = global.adom {
        config.adom = Some(adom.clone());
    }
}

fn parse_url(url_str: &str) -> Result<url::Url, CliError> {
    url_str.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {url_str}"),
    })
}

pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}
