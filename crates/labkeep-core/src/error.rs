// ── Core error types ──
//
// User-facing errors from labkeep-core. Consumers never see raw HTTP or
// JSON failures; the `From<labkeep_api::Error>` impl translates them into
// domain variants, and `category()` folds everything into the four kinds
// a view needs to decide how to present a failure.

use thiserror::Error;

/// The four ways an operation can fail, as far as presentation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ErrorCategory {
    /// Bad credentials, or a missing/expired token.
    Auth,
    /// The write clashes with server state (duplicate membership, already complete).
    Conflict,
    /// Rejected locally before anything was sent.
    Validation,
    /// Any other server or transport failure.
    Request,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Auth errors ──────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Not signed in -- run `labkeep login` first")]
    NotSignedIn,

    // ── Client-side validation ───────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    // ── Server responses ─────────────────────────────────────────────
    #[error("{message}")]
    Conflict { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    /// The server answered, but with data that breaks a domain invariant.
    #[error("Invalid {entity} data from server: {message}")]
    InvalidData {
        entity: &'static str,
        message: String,
    },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("View was closed before the request finished")]
    Cancelled,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication { .. } | Self::NotSignedIn => ErrorCategory::Auth,
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::Validation { .. } => ErrorCategory::Validation,
            _ => ErrorCategory::Request,
        }
    }

    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<labkeep_api::Error> for CoreError {
    fn from(err: labkeep_api::Error) -> Self {
        match err {
            labkeep_api::Error::Authentication { message } => {
                CoreError::Authentication { message }
            }
            labkeep_api::Error::MissingToken => CoreError::NotSignedIn,
            labkeep_api::Error::NotFound { message } => CoreError::NotFound { message },
            labkeep_api::Error::Conflict { message } => CoreError::Conflict { message },
            labkeep_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            labkeep_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            labkeep_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            labkeep_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("API URL must be http(s)://host[:port][/prefix], got {url}"),
            },
            labkeep_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            labkeep_api::Error::InvalidHeader { header, reason } => CoreError::Config {
                message: format!("Invalid {header} header value: {reason}"),
            },
            labkeep_api::Error::Encode(message) => {
                CoreError::Internal(format!("Request encoding error: {message}"))
            }
            labkeep_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
