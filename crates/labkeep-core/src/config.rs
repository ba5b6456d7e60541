// ── Runtime client configuration ──
//
// Describes *how* to reach the lab-management service. Carries the access
// key and connection tuning but never touches disk: the CLI builds a
// `ClientConfig` from its profile and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs on a lab server).
    DangerAcceptInvalid,
}

/// Configuration for one lab-management server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL (e.g., `http://10.0.0.5:8000`).
    pub url: Url,
    /// Static access key sent as the `api-key` header.
    pub access_key: SecretString,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Session-history page size.
    pub page_size: usize,
    /// How many pending tasks a lab overview shows.
    pub pending_preview: usize,
}

impl ClientConfig {
    pub const DEFAULT_PAGE_SIZE: usize = 10;
    pub const DEFAULT_PENDING_PREVIEW: usize = 3;

    pub fn new(url: Url, access_key: SecretString) -> Self {
        Self {
            url,
            access_key,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_size: Self::DEFAULT_PAGE_SIZE,
            pending_preview: Self::DEFAULT_PENDING_PREVIEW,
        }
    }
}
