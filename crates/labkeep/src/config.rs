//! CLI configuration -- thin wrapper around `labkeep_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--api-url, --access-key, --timeout, ...).

use std::time::Duration;

use secrecy::SecretString;

use labkeep_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use labkeep_config::{
    Config, Defaults, Profile, StoredSession, clear_session, config_path, load_config_or_default,
    load_session, save_config, save_session, store_access_key,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the `ClientConfig` for the active profile.
///
/// Works without a config file when `--api-url` and `--access-key` are given.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<(ClientConfig, String), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let config = resolve_profile(profile, &profile_name, &cfg.defaults, global)?;
        return Ok((config, profile_name));
    }

    if global.profile.is_some() && !cfg.profiles.is_empty() {
        let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available.join(", "),
        });
    }

    // No profile -- build from flags / env vars alone
    let url_str = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = labkeep_config::parse_api_url(url_str)?;

    let Some(ref key) = global.access_key else {
        return Err(CliError::NoAccessKey {
            profile: profile_name,
        });
    };

    let mut config = ClientConfig::new(url, SecretString::from(key.clone()));
    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    config.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));
    config.page_size = cfg.defaults.page_size;
    config.pending_preview = cfg.defaults.pending_preview;
    Ok((config, profile_name))
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    // 1. URL (flag > env > profile)
    let url_str = global.api_url.as_deref().unwrap_or(&profile.api_url);
    let url = labkeep_config::parse_api_url(url_str)?;

    // 2. Access key (flag > profile chain)
    let access_key = match global.access_key {
        Some(ref key) => SecretString::from(key.clone()),
        None => labkeep_config::resolve_access_key(profile, profile_name)?,
    };

    let mut config = ClientConfig::new(url, access_key);

    // 3. TLS verification
    config.tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        labkeep_config::profile_tls(profile)
    };

    // 4. Timeout and view sizes
    let secs = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(defaults.timeout);
    config.timeout = Duration::from_secs(secs);
    config.page_size = defaults.page_size;
    config.pending_preview = defaults.pending_preview;
    Ok(config)
}
