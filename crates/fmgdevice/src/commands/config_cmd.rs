//! Config subcommand handlers.

use dialoguer::{Input, Select};

use fmgdevice_core::WorkspaceMode;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const VALID_KEYS: &str = "url, auth_mode, username, token, token_env, adom, device_name, \
     device_vdom, workspace_mode, ca_cert, insecure, timeout, retries";

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking secrets.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "url = \"{}\"", p.url);
        let _ = writeln!(out, "auth_mode = \"{}\"", p.auth_mode);
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if p.token.is_some() {
            let _ = writeln!(out, "token = \"****\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref adom) = p.adom {
            let _ = writeln!(out, "adom = \"{adom}\"");
        }
        if let Some(ref device) = p.device_name {
            let _ = writeln!(out, "device_name = \"{device}\"");
        }
        let _ = writeln!(out, "device_vdom = \"{}\"", p.device_vdom);
        let _ = writeln!(out, "workspace_mode = \"{}\"", p.workspace_mode);
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(retries) = p.retries {
            let _ = writeln!(out, "retries = {retries}");
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into `CliError`.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_secret(prompt: &str, field: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Offer to store a secret in the system keyring.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(
    profile_name: &str,
    kind: &str,
    secret: &str,
    label: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {label}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_secret(profile_name, kind, secret)?;
        eprintln!("   ✓ {label} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret.to_owned()))
    }
}

fn parse_flag<T: std::str::FromStr>(field: &str, value: &str, hint: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: hint.into(),
    })
}

/// Apply one `config set` assignment to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "url" => profile.url = value,
        "auth_mode" | "auth-mode" => {
            if !matches!(value.as_str(), "token" | "session") {
                return Err(CliError::Validation {
                    field: "auth_mode".into(),
                    reason: "must be 'token' or 'session'".into(),
                });
            }
            profile.auth_mode = value;
        }
        "username" => profile.username = Some(value),
        "token" => profile.token = Some(value),
        "token_env" | "token-env" => profile.token_env = Some(value),
        "adom" => profile.adom = Some(value),
        "device_name" | "device-name" => profile.device_name = Some(value),
        "device_vdom" | "device-vdom" => profile.device_vdom = value,
        "workspace_mode" | "workspace-mode" => {
            profile.workspace_mode = parse_flag::<WorkspaceMode>(
                "workspace_mode",
                &value,
                "must be 'disable' or 'normal'",
            )?;
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(parse_flag("insecure", &value, "must be 'true' or 'false'")?);
        }
        "timeout" => {
            profile.timeout = Some(parse_flag("timeout", &value, "must be a number (seconds)")?);
        }
        "retries" => {
            profile.retries = Some(parse_flag("retries", &value, "must be a non-negative number")?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {VALID_KEYS}"),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("fmgdevice configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let url: String = Input::new()
                .with_prompt("FortiManager URL")
                .default("https://fortimanager.example.net".into())
                .interact_text()
                .map_err(prompt_err)?;

            let mut profile = Profile::new(url);

            let auth_choices = &["API token (recommended)", "Username/Password session"];
            let auth_selection = Select::new()
                .with_prompt("Authentication method")
                .items(auth_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            if auth_selection == 0 {
                let token = prompt_secret("API token: ", "token")?;
                profile.auth_mode = "token".into();
                profile.token = prompt_keyring_storage(&profile_name, "token", &token, "API token")?;
            } else {
                let user: String = Input::new()
                    .with_prompt("Username")
                    .interact_text()
                    .map_err(prompt_err)?;
                let pass = prompt_secret("Password: ", "password")?;
                profile.auth_mode = "session".into();
                profile.username = Some(user);
                profile.password =
                    prompt_keyring_storage(&profile_name, "password", &pass, "Password")?;
            }

            let device: String = Input::new()
                .with_prompt("Default device (blank for none)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            if !device.is_empty() {
                profile.device_name = Some(device);
            }

            profile.device_vdom = Input::new()
                .with_prompt("Default VDOM")
                .default("root".into())
                .interact_text()
                .map_err(prompt_err)?;

            let adom: String = Input::new()
                .with_prompt("ADOM for workspace locking (blank for none)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            if !adom.is_empty() {
                profile.adom = Some(adom);
                let ws = Select::new()
                    .with_prompt("Workspace mode")
                    .items(&["disable", "normal"])
                    .default(0)
                    .interact()
                    .map_err(prompt_err)?;
                if ws == 1 {
                    profile.workspace_mode = WorkspaceMode::Normal;
                }
            }

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: fmgdevice status --insecure");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(|| Profile::new(String::new()));
            set_profile_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            output::success(global, &format!("Set {key} on profile '{profile_name}'"));
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: fmgdevice config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::success(global, &format!("Default profile set to '{name}'"));
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile =
                cfg.profiles
                    .get(&profile_name)
                    .ok_or_else(|| CliError::ProfileNotFound {
                        name: profile_name.clone(),
                        available: config::available_profiles(&cfg),
                    })?;

            if profile.auth_mode == "session" {
                let pass = prompt_secret("Password: ", "password")?;
                config::store_secret(&profile_name, "password", &pass)?;
            } else {
                let token = prompt_secret("API token: ", "token")?;
                config::store_secret(&profile_name, "token", &token)?;
            }

            output::success(
                global,
                &format!("Secret stored in system keyring for profile '{profile_name}'"),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_parses_typed_keys() {
        let mut profile = Profile::new("https://fmg.example.net");
        set_profile_key(&mut profile, "workspace_mode", "normal".into()).unwrap();
        set_profile_key(&mut profile, "retries", "3".into()).unwrap();
        set_profile_key(&mut profile, "device-name", "fgt1".into()).unwrap();
        assert_eq!(profile.workspace_mode, WorkspaceMode::Normal);
        assert_eq!(profile.retries, Some(3));
        assert_eq!(profile.device_name.as_deref(), Some("fgt1"));
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut profile = Profile::new("https://fmg.example.net");
        assert!(set_profile_key(&mut profile, "auth_mode", "hybrid".into()).is_err());
        assert!(set_profile_key(&mut profile, "workspace_mode", "workflow".into()).is_err());
        assert!(set_profile_key(&mut profile, "site", "x".into()).is_err());
    }

    #[test]
    fn show_masks_secrets() {
        let mut cfg = Config::default();
        let mut profile = Profile::new("https://fmg.example.net");
        profile.token = Some("s3cret".into());
        cfg.profiles.insert("lab".into(), profile);
        let text = format_config_redacted(&cfg);
        assert!(text.contains("token = \"****\""));
        assert!(!text.contains("s3cret"));
    }
}
