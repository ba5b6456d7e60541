//! Shared configuration for the labkeep CLI.
//!
//! TOML profiles, access-key resolution (env + keyring + plaintext), the
//! persisted session file, and TLS settings for `labkeep_core::ClientConfig`.
//! The CLI adds `GlobalOpts`-aware resolution on top.

use std::collections::HashMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use labkeep_core::{AuthSession, ClientConfig, TlsVerification, User};

/// Keyring service name; entries are `<profile>/access-key`.
pub const KEYRING_SERVICE: &str = "labkeep";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no access key configured for profile '{profile}'")]
    NoAccessKey { profile: String },

    #[error("profile '{profile}' not found in config")]
    UnknownProfile { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("session file is corrupt: {0}")]
    Session(#[from] serde_json::Error),

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

    /// Named server profiles.
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

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Session-history page size.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Pending tasks shown on a lab overview.
    #[serde(default = "default_pending_preview")]
    pub pending_preview: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            page_size: default_page_size(),
            pending_preview: default_pending_preview(),
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
fn default_page_size() -> usize {
    ClientConfig::DEFAULT_PAGE_SIZE
}
fn default_pending_preview() -> usize {
    ClientConfig::DEFAULT_PENDING_PREVIEW
}

/// A named server profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Service base URL (e.g., "http://10.0.0.5:8000").
    pub api_url: String,

    /// Access key (plaintext -- prefer keyring or env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Environment variable name containing the access key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_env: Option<String>,

    /// Username pre-filled by `labkeep login`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Path to custom CA certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    ProjectDirs::from("org", "labkeep", "labkeep").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("labkeep");
            p
        },
        |dirs| dirs.config_dir().to_path_buf(),
    )
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Where a profile's signed-in session is persisted.
pub fn session_path(profile_name: &str) -> Result<PathBuf, ConfigError> {
    session_path_in(&config_dir(), profile_name)
}

/// Profile names become file names, so they must stay inside `sessions/`.
fn session_path_in(dir: &Path, profile_name: &str) -> Result<PathBuf, ConfigError> {
    let unsafe_name = profile_name.is_empty()
        || profile_name == "."
        || profile_name == ".."
        || profile_name.contains(['/', '\\', '\0']);
    if unsafe_name {
        return Err(ConfigError::Validation {
            field: "profile".into(),
            reason: format!("'{profile_name}' cannot be used as a session file name"),
        });
    }
    Ok(dir.join("sessions").join(format!("{profile_name}.json")))
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// Environment keys use `__` for nesting: `LABKEEP_DEFAULTS__PAGE_SIZE=20`.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LABKEEP_").split("__"));

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

// ── Access key ──────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/access-key"),
    )?)
}

/// Resolve the access key from the credential chain (no CLI flag step).
pub fn resolve_access_key(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's access_key_env -> env var lookup
    if let Some(ref env_name) = profile.access_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.access_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoAccessKey {
        profile: profile_name.into(),
    })
}

/// Store the access key in the system keyring.
pub fn store_access_key(profile_name: &str, key: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(key.expose_secret())?;
    Ok(())
}

// ── URL and TLS ─────────────────────────────────────────────────────

pub fn parse_api_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.trim().parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected http:// or https://, got {raw}"),
        });
    }
    Ok(url)
}

pub fn profile_tls(profile: &Profile) -> TlsVerification {
    if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

// ── Session persistence ─────────────────────────────────────────────

/// On-disk shape of a signed-in session.
#[derive(Debug, Deserialize, Serialize)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

impl From<&AuthSession> for StoredSession {
    fn from(session: &AuthSession) -> Self {
        Self {
            token: session.token.expose_secret().to_owned(),
            user: session.user.clone(),
        }
    }
}

impl StoredSession {
    pub fn token(&self) -> SecretString {
        SecretString::from(self.token.clone())
    }
}

pub fn save_session(profile_name: &str, session: &StoredSession) -> Result<(), ConfigError> {
    save_session_to(&session_path(profile_name)?, session)
}

pub fn save_session_to(path: &Path, session: &StoredSession) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec_pretty(session)?;
    let mut file = open_private(path)?;
    file.write_all(&bytes)?;
    // An existing file keeps its old mode, so narrow it too
    restrict_permissions(path)?;
    debug!(path = %path.display(), "session saved");
    Ok(())
}

#[cfg(unix)]
fn open_private(path: &Path) -> Result<std::fs::File, ConfigError> {
    use std::os::unix::fs::OpenOptionsExt;
    Ok(std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> Result<std::fs::File, ConfigError> {
    Ok(std::fs::File::create(path)?)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

/// Load the persisted session, if any.
pub fn load_session(profile_name: &str) -> Result<Option<StoredSession>, ConfigError> {
    load_session_from(&session_path(profile_name)?)
}

pub fn load_session_from(path: &Path) -> Result<Option<StoredSession>, ConfigError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Delete the persisted session. Returns whether one existed.
pub fn clear_session(profile_name: &str) -> Result<bool, ConfigError> {
    clear_session_at(&session_path(profile_name)?)
}

pub fn clear_session_at(path: &Path) -> Result<bool, ConfigError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn profile_round_trips_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.defaults.page_size = 20;
        cfg.profiles.insert(
            "escola".into(),
            Profile {
                api_url: "http://10.0.0.5:8000".into(),
                access_key: Some("plain-key".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.defaults.page_size, 20);
        assert_eq!(loaded.defaults.pending_preview, 3);
        let profile = &loaded.profiles["escola"];
        assert_eq!(profile.api_url, "http://10.0.0.5:8000");
        assert!(profile.access_key_env.is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.page_size, 10);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn unset_access_key_env_falls_through_to_plaintext() {
        let var = "LABKEEP_TEST_ACCESS_KEY_UNSET";
        let profile = Profile {
            api_url: "http://lab".into(),
            access_key: Some("plain".into()),
            access_key_env: Some(var.into()),
            ..Profile::default()
        };
        assert!(std::env::var(var).is_err());
        let key = resolve_access_key(&profile, "labkeep-test-no-keyring-entry").unwrap();
        assert_eq!(key.expose_secret(), "plain");
    }

    #[test]
    fn rejects_non_http_url() {
        assert!(parse_api_url("ftp://lab").is_err());
        assert!(parse_api_url("not a url").is_err());
        assert!(parse_api_url("https://lab.example/api").is_ok());
    }

    #[test]
    fn session_file_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = session_path_in(dir.path(), "default").unwrap();
        assert!(load_session_from(&path).unwrap().is_none());

        let stored = StoredSession {
            token: "tok-123".into(),
            user: User {
                id: 7,
                username: "prof".into(),
                role: None,
                is_active: true,
            },
        };
        save_session_to(&path, &stored).unwrap();
        let loaded = load_session_from(&path).unwrap().unwrap();
        assert_eq!(loaded.user, stored.user);
        assert_eq!(loaded.token().expose_secret(), "tok-123");

        assert!(clear_session_at(&path).unwrap());
        assert!(!clear_session_at(&path).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = session_path_in(dir.path(), "default").unwrap();
        let stored = StoredSession {
            token: "tok-123".into(),
            user: User {
                id: 7,
                username: "prof".into(),
                role: None,
                is_active: true,
            },
        };
        save_session_to(&path, &stored).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn profile_names_cannot_escape_sessions_dir() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["../x", "a/b", "a\\b", "..", ""] {
            let err = session_path_in(dir.path(), name).unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation { ref field, .. } if field == "profile"),
                "{name:?}: {err}"
            );
        }
        assert!(session_path_in(dir.path(), "escola-2").is_ok());
    }
}
