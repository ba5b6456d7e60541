// ── User domain type ──

use serde::{Deserialize, Serialize};

/// The authenticated user, as cached by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub is_active: bool,
}
