use thiserror::Error;

/// Top-level error type for the `labkeep-api` crate.
///
/// Every request routed through [`ApiClient`](crate::ApiClient) fails with one
/// of these. Server-supplied messages are already normalized into `message`
/// fields; `labkeep-core` maps the variants into its domain taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected, or the bearer token is expired/invalid (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The endpoint needs a bearer token and none was supplied.
    #[error("Not signed in -- this request requires a bearer token")]
    MissingToken,

    // ── Server responses ────────────────────────────────────────────
    /// The addressed resource does not exist (HTTP 404).
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The write conflicts with current server state (HTTP 409).
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Any other non-2xx response.
    #[error("Request failed (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be used for API paths: {0}")]
    InvalidBaseUrl(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// A credential could not be encoded as an HTTP header value.
    #[error("Invalid {header} header value: {reason}")]
    InvalidHeader { header: &'static str, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// A request body could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// JSON (de)serialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the server reported a conflicting write.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// HTTP status associated with this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
