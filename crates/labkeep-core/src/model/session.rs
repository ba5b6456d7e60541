// ── Usage-session domain type ──

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const START_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// One student's login on one machine. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSession {
    pub student_name: String,
    pub machine_name: String,
    pub machine_key: Option<String>,
    pub class_var: String,
    /// `session_start` exactly as the server sent it.
    pub session_start: String,
    /// Parsed `session_start`; `None` when the server format is unrecognized.
    pub started_at: Option<NaiveDateTime>,
    pub cpu_usage: Option<f64>,
    pub ram_usage: Option<f64>,
    pub cpu_temp: Option<f64>,
}

/// Parse a session start timestamp (`YYYY-MM-DD HH:MM[:SS[.fff]]`).
pub fn parse_session_start(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    START_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

impl UsageSession {
    /// `dd/mm/yyyy - HH:MM`, or the raw value when it could not be parsed.
    pub fn display_start(&self) -> String {
        self.started_at.map_or_else(
            || self.session_start.clone(),
            |at| at.format("%d/%m/%Y - %H:%M").to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_server_timestamps() {
        let at = parse_session_start("2025-06-28 10:15:42.123456").unwrap();
        assert_eq!((at.day(), at.hour(), at.minute()), (28, 10, 15));
        assert!(parse_session_start("2025-06-28T10:15:42").is_some());
        assert!(parse_session_start("2025-06-28 10:15").is_some());
        assert!(parse_session_start("28/06/2025 10:15:42").is_some());
        assert!(parse_session_start("later").is_none());
    }
}
