// ── Student domain type ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: i64,
    pub student_name: String,
    pub class_var: String,
    pub lab_id: Option<String>,
}
