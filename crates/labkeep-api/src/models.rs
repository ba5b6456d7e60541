// Wire types for the lab-management REST service.
//
// These mirror the server JSON verbatim. Field naming is inconsistent across
// endpoints (`name` vs `machine_name`, `id` vs `user_id`), so aliases and
// defaults absorb the differences; `labkeep-core` converts into domain types.

use serde::{Deserialize, Deserializer, Serialize};

// ── Auth / users ─────────────────────────────────────────────────────

/// `POST /auth/token` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `GET /users/me/` and `GET /users/{id}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    #[serde(alias = "user_id")]
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// ── Labs ─────────────────────────────────────────────────────────────

/// A lab as returned by `GET /lab/{id}` and `GET /users/me/labs`.
///
/// `classes` is stored server-side as a comma-separated string; some
/// responses send it as a list instead.
#[derive(Debug, Clone, Deserialize)]
pub struct LabResponse {
    pub lab_id: String,
    pub lab_name: String,
    #[serde(default, deserialize_with = "classes_from_wire")]
    pub classes: Vec<String>,
    #[serde(default)]
    pub student_count: u32,
    #[serde(default)]
    pub machine_count: u32,
    #[serde(default)]
    pub user_count: u32,
    #[serde(default)]
    pub task_count: u32,
}

fn classes_from_wire<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Classes {
        Joined(String),
        List(Vec<String>),
    }

    let split = |s: &str| {
        s.split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned)
            .collect::<Vec<_>>()
    };

    Ok(match Option::<Classes>::deserialize(d)? {
        None => Vec::new(),
        Some(Classes::Joined(s)) => split(&s),
        Some(Classes::List(list)) => list.iter().flat_map(|c| split(c.as_str())).collect(),
    })
}

/// `POST /lab/new_lab` body.
#[derive(Debug, Clone, Serialize)]
pub struct LabCreate {
    pub lab_id: String,
    pub lab_name: String,
    pub classes: String,
}

/// `PATCH /lab/update/{id}` body. `lab_id` is immutable and never sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LabUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
}

// ── Machines ─────────────────────────────────────────────────────────

/// A machine as returned by `GET /lab/{id}/machines` and
/// `GET /machine_config/{key}`.
///
/// The single-machine endpoint omits `machine_key`; callers fill it in.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineResponse {
    #[serde(default)]
    pub machine_key: Option<String>,
    #[serde(alias = "name")]
    pub machine_name: String,
    #[serde(default)]
    pub motherboard: String,
    #[serde(default)]
    pub memory: String,
    #[serde(default)]
    pub storage: String,
    pub state_cleanliness: String,
    #[serde(default)]
    pub last_checked: Option<String>,
    #[serde(default)]
    pub lab_id: Option<String>,
}

/// `PATCH /machine_config/update/{key}/last_check` body.
#[derive(Debug, Clone, Serialize)]
pub struct LastCheckUpdate<'a> {
    pub last_checked: &'a str,
}

/// `PATCH /machine_config/update/{key}/state_cleanliness` body.
#[derive(Debug, Clone, Serialize)]
pub struct CleanlinessUpdate<'a> {
    pub state_cleanliness: &'a str,
}

// ── Students ─────────────────────────────────────────────────────────

/// `GET /lab/{id}/students` item.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentResponse {
    #[serde(alias = "id")]
    pub student_id: i64,
    #[serde(alias = "name")]
    pub student_name: String,
    #[serde(default)]
    pub class_var: String,
    #[serde(default)]
    pub lab_id: Option<String>,
}

// ── Sessions ─────────────────────────────────────────────────────────

/// Student block nested inside some session responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionStudent {
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub class_var: Option<String>,
}

/// `GET /session/{lab|machine|student}/{id}` item.
///
/// Student fields arrive either flat or nested under `student`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub session_start: String,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub class_var: Option<String>,
    #[serde(default)]
    pub student: Option<SessionStudent>,
    #[serde(default)]
    pub machine_name: Option<String>,
    #[serde(default)]
    pub machine_key: Option<String>,
    #[serde(default)]
    pub cpu_usage: Option<f64>,
    #[serde(default)]
    pub ram_usage: Option<f64>,
    #[serde(default)]
    pub cpu_temp: Option<f64>,
}

impl SessionResponse {
    pub fn student_name(&self) -> Option<&str> {
        self.student_name
            .as_deref()
            .or_else(|| self.student.as_ref()?.student_name.as_deref())
    }

    pub fn class_var(&self) -> Option<&str> {
        self.class_var
            .as_deref()
            .or_else(|| self.student.as_ref()?.class_var.as_deref())
    }
}

// ── Tasks ────────────────────────────────────────────────────────────

/// `GET /tasks/lab/{id}` and `GET /tasks/machine/{key}` item.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskResponse {
    pub task_id: i64,
    pub task_name: String,
    #[serde(default)]
    pub task_description: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub task_creation: Option<String>,
    #[serde(default)]
    pub machine_keys: Vec<String>,
    #[serde(default)]
    pub machine_names: Vec<String>,
    #[serde(default)]
    pub lab_id: Option<String>,
}

/// `POST /tasks/new` body.
#[derive(Debug, Clone, Serialize)]
pub struct TaskCreate {
    pub lab_id: String,
    pub task_name: String,
    pub task_description: String,
    pub machines: Vec<String>,
}

// ── Writes ───────────────────────────────────────────────────────────

/// Acknowledgement body returned by write endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
