// ── Machine domain types ──
//
// `CleanlinessState` and `CheckDate` are the two values a user may change
// on a machine; both can only be built from input that passed validation.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::CoreError;

/// How urgently a machine needs cleaning.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::VariantNames,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum CleanlinessState {
    Bom,
    Regular,
    Urgente,
}

impl CleanlinessState {
    /// Parse user input, rejecting anything outside the three states.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        Self::from_str(raw.trim()).map_err(|_| {
            CoreError::validation(
                "state_cleanliness",
                format!("'{raw}' is not one of BOM, REGULAR, URGENTE"),
            )
        })
    }
}

/// A machine's last-inspection date.
///
/// User input must be `dd/mm/yyyy` and a real calendar date; it displays
/// back exactly in that form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheckDate(NaiveDate);

impl CheckDate {
    /// Parse `dd/mm/yyyy` user input.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let bytes = raw.as_bytes();
        let shaped = bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                2 | 5 => *b == b'/',
                _ => b.is_ascii_digit(),
            });
        if !shaped {
            return Err(CoreError::validation(
                "last_checked",
                format!("'{raw}' must use the format dd/mm/yyyy"),
            ));
        }
        NaiveDate::parse_from_str(raw, "%d/%m/%Y")
            .map(Self)
            .map_err(|_| {
                CoreError::validation("last_checked", format!("'{raw}' is not a calendar date"))
            })
    }

    /// Decode a server-supplied date: ISO `YYYY-MM-DD` (optionally followed
    /// by a time) or `dd/mm/yyyy`.
    pub fn from_server(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let iso = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(iso, "%Y-%m-%d")
            .ok()
            .map(Self)
            .or_else(|| Self::parse(raw).ok())
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CheckDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CheckDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:04}",
            self.0.day(),
            self.0.month(),
            self.0.year()
        )
    }
}

impl FromStr for CheckDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CheckDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CheckDate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_server(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid check date: {raw}")))
    }
}

/// A machine inside a lab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub machine_key: String,
    pub machine_name: String,
    pub motherboard: String,
    pub memory: String,
    pub storage: String,
    pub state_cleanliness: CleanlinessState,
    pub last_checked: Option<CheckDate>,
    pub lab_id: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn cleanliness_accepts_only_three_states() {
        assert_eq!(CleanlinessState::parse("BOM").unwrap(), CleanlinessState::Bom);
        assert_eq!(
            CleanlinessState::parse("urgente").unwrap(),
            CleanlinessState::Urgente
        );
        assert_eq!(CleanlinessState::Regular.to_string(), "REGULAR");
        for bad in ["", "LIMPO", "BOMM", "0"] {
            assert!(CleanlinessState::parse(bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn check_date_rejects_other_shapes() {
        let shapes = [
            "2025-06-28",
            "28/6/2025",
            "28-06-2025",
            "28/06/25",
            " 28/06/2025",
            "31/02/2025",
        ];
        for bad in shapes {
            assert!(CheckDate::parse(bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn check_date_echoes_input() {
        let date = CheckDate::parse("28/06/2025").unwrap();
        assert_eq!(date.to_string(), "28/06/2025");
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2025, 6, 28).unwrap());
    }

    #[test]
    fn server_dates_decode_from_iso() {
        let date = CheckDate::from_server("2025-06-28").unwrap();
        assert_eq!(date.to_string(), "28/06/2025");
        assert!(CheckDate::from_server("2025-06-28T00:00:00").is_some());
        assert!(CheckDate::from_server("01/02/2024").is_some());
        assert!(CheckDate::from_server("yesterday").is_none());
    }
}
