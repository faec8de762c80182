//! CLI configuration: thin wrapper around `octoly_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` overrides (--server, --api-key, --space, ...).

use std::time::Duration;

use secrecy::SecretString;

use octoly_core::{AuthCredentials, ConnectionConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use octoly_config::{
    Config, Profile, config_path, default_space, load_config_or_default, parse_server_url,
    profile_tls, save_config, store_api_key,
};

/// Where a command runs: the server session settings plus the space name.
#[derive(Debug)]
pub struct Target {
    pub connection: ConnectionConfig,
    pub space: String,
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the command target from the config file, the active profile and
/// CLI overrides. Works without any profile when `--server` and
/// `--api-key` are both given.
pub fn resolve_target(global: &GlobalOpts) -> Result<Target, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global, &cfg);
    }

    // An explicitly requested profile must exist.
    if let Some(ref name) = global.profile {
        let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: name.clone(),
            available: if names.is_empty() {
                "(none)".into()
            } else {
                names.join(", ")
            },
        });
    }

    let server = global.server.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = parse_server_url(server)?;

    let key = global.api_key.clone().ok_or(CliError::NoCredentials {
        profile: profile_name,
    })?;

    let tls = if global.insecure || cfg.defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(Target {
        connection: ConnectionConfig {
            url,
            credentials: AuthCredentials::ApiKey(SecretString::from(key)),
            tls,
            timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
        },
        space: global.space.clone().unwrap_or_else(default_space),
    })
}

/// Translate a `Profile` + global flags into a `Target`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<Target, CliError> {
    // 1. Server URL (flag > env > profile)
    let url = parse_server_url(global.server.as_deref().unwrap_or(&profile.server))?;

    // 2. API key (flag > env > profile chain)
    let key = match global.api_key {
        Some(ref key) => SecretString::from(key.clone()),
        None => octoly_config::resolve_api_key(profile, profile_name)?,
    };

    // 3. TLS verification
    let tls = if global.insecure || cfg.defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        profile_tls(profile)
    };

    // 4. Timeout (flag > profile > defaults)
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);

    Ok(Target {
        connection: ConnectionConfig {
            url,
            credentials: AuthCredentials::ApiKey(key),
            tls,
            timeout: Duration::from_secs(timeout),
        },
        // 5. Space (flag > env > profile)
        space: global.space.clone().unwrap_or_else(|| profile.space.clone()),
    })
}
