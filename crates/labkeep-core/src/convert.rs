// ── API-to-domain type conversions ──
//
// Bridges raw `labkeep_api` response types into canonical `model` types.
// Lenient where the server is inconsistent (missing optional fields), strict
// where a domain invariant is at stake (cleanliness state, machine key).

use chrono::NaiveDate;

use labkeep_api::models::{
    LabResponse, MachineResponse, SessionResponse, StudentResponse, TaskResponse, UserResponse,
};

use crate::error::CoreError;
use crate::model::session::parse_session_start;
use crate::model::{
    CheckDate, CleanlinessState, Lab, Machine, Student, Task, UsageSession, User,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse the date part of a server timestamp (`YYYY-MM-DD[...]`).
fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok()
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

// ── Users / labs / students ────────────────────────────────────────

impl From<UserResponse> for User {
    fn from(u: UserResponse) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            is_active: u.is_active,
        }
    }
}

impl From<LabResponse> for Lab {
    fn from(l: LabResponse) -> Self {
        Self {
            lab_id: l.lab_id,
            lab_name: l.lab_name,
            classes: dedup_in_order(l.classes),
            student_count: l.student_count,
            machine_count: l.machine_count,
            user_count: l.user_count,
            task_count: l.task_count,
        }
    }
}

impl From<StudentResponse> for Student {
    fn from(s: StudentResponse) -> Self {
        Self {
            student_id: s.student_id,
            student_name: s.student_name,
            class_var: s.class_var,
            lab_id: s.lab_id,
        }
    }
}

// ── Machines ───────────────────────────────────────────────────────

impl TryFrom<MachineResponse> for Machine {
    type Error = CoreError;

    fn try_from(m: MachineResponse) -> Result<Self, Self::Error> {
        let machine_key = m.machine_key.ok_or_else(|| CoreError::InvalidData {
            entity: "machine",
            message: format!("'{}' has no machine_key", m.machine_name),
        })?;
        let state_cleanliness = m
            .state_cleanliness
            .parse::<CleanlinessState>()
            .map_err(|_| CoreError::InvalidData {
                entity: "machine",
                message: format!(
                    "'{machine_key}' has unknown state_cleanliness '{}'",
                    m.state_cleanliness
                ),
            })?;

        Ok(Self {
            last_checked: m.last_checked.as_deref().and_then(CheckDate::from_server),
            machine_key,
            machine_name: m.machine_name,
            motherboard: m.motherboard,
            memory: m.memory,
            storage: m.storage,
            state_cleanliness,
            lab_id: m.lab_id,
        })
    }
}

// ── Sessions ───────────────────────────────────────────────────────

impl From<SessionResponse> for UsageSession {
    fn from(s: SessionResponse) -> Self {
        Self {
            student_name: s.student_name().unwrap_or_default().to_owned(),
            class_var: s.class_var().unwrap_or_default().to_owned(),
            started_at: parse_session_start(&s.session_start),
            session_start: s.session_start,
            machine_name: s.machine_name.unwrap_or_default(),
            machine_key: s.machine_key,
            cpu_usage: s.cpu_usage,
            ram_usage: s.ram_usage,
            cpu_temp: s.cpu_temp,
        }
    }
}

// ── Tasks ──────────────────────────────────────────────────────────

impl From<TaskResponse> for Task {
    fn from(t: TaskResponse) -> Self {
        Self {
            created_on: t.task_creation.as_deref().and_then(parse_iso_date),
            task_id: t.task_id,
            task_name: t.task_name,
            task_description: t.task_description.unwrap_or_default(),
            is_complete: t.is_complete,
            machine_keys: t.machine_keys,
            machine_names: t.machine_names,
            lab_id: t.lab_id,
        }
    }
}

/// Convert a whole machine listing, failing on the first invalid entry.
pub(crate) fn machines(list: Vec<MachineResponse>) -> Result<Vec<Machine>, CoreError> {
    list.into_iter().map(Machine::try_from).collect()
}

pub(crate) fn collect<W, D: From<W>>(list: Vec<W>) -> Vec<D> {
    list.into_iter().map(D::from).collect()
}
