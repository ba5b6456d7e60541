// ── Notifications and write outcomes ──
//
// Every operation ends in a `Notice` the presentation layer can show. A
// successful write that fails to re-read its list is still a success; the
// refresh failure rides along as a warning.

use serde::Serialize;

use crate::error::{CoreError, ErrorCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    /// Conflicts are informational (the state the user wanted already
    /// holds); everything else is an error.
    pub fn from_error(err: &CoreError) -> Self {
        let level = match err.category() {
            ErrorCategory::Conflict => NoticeLevel::Info,
            _ => NoticeLevel::Error,
        };
        Self::new(level, err.to_string())
    }
}

/// Result of the re-read that follows a successful write.
#[derive(Debug)]
pub enum Refresh<T> {
    Fresh(T),
    Stale(CoreError),
}

/// A successful write plus the re-fetched state it affected.
#[derive(Debug)]
pub struct WriteOutcome<T> {
    /// The server's acknowledgement message.
    pub message: String,
    pub refresh: Refresh<T>,
}

impl<T> WriteOutcome<T> {
    pub(crate) fn new(message: String, refresh: Result<T, CoreError>) -> Self {
        let refresh = match refresh {
            Ok(value) => Refresh::Fresh(value),
            Err(err) => {
                tracing::warn!(error = %err, "refresh after write failed");
                Refresh::Stale(err)
            }
        };
        Self { message, refresh }
    }

    /// The re-fetched value, if the refresh succeeded.
    pub fn fresh(&self) -> Option<&T> {
        match &self.refresh {
            Refresh::Fresh(value) => Some(value),
            Refresh::Stale(_) => None,
        }
    }

    pub fn into_fresh(self) -> Option<T> {
        match self.refresh {
            Refresh::Fresh(value) => Some(value),
            Refresh::Stale(_) => None,
        }
    }

    /// Success notice, plus a warning when the refresh failed.
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = vec![Notice::success(self.message.clone())];
        if let Refresh::Stale(err) = &self.refresh {
            notices.push(Notice::warning(format!(
                "Saved, but the list could not be reloaded: {err}"
            )));
        }
        notices
    }
}
