// ── Lab domain types ──

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A laboratory and the server-maintained counters shown on its overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lab {
    /// User-chosen slug; immutable after creation.
    pub lab_id: String,
    pub lab_name: String,
    /// Class labels, deduplicated, in server order.
    pub classes: Vec<String>,
    pub student_count: u32,
    pub machine_count: u32,
    pub user_count: u32,
    pub task_count: u32,
}

/// Request to create a lab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLab {
    pub lab_id: String,
    pub lab_name: String,
    pub classes: Vec<String>,
}

impl NewLab {
    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        if self.lab_id.trim().is_empty() {
            return Err(CoreError::validation("lab_id", "must not be empty"));
        }
        if self.lab_name.trim().is_empty() {
            return Err(CoreError::validation("lab_name", "must not be empty"));
        }
        Ok(())
    }
}

/// Partial update of a lab. `lab_id` cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabChanges {
    pub lab_name: Option<String>,
    pub classes: Option<Vec<String>>,
}

impl LabChanges {
    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        if self.lab_name.is_none() && self.classes.is_none() {
            return Err(CoreError::validation(
                "lab update",
                "specify at least one of name or classes",
            ));
        }
        if self.lab_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(CoreError::validation("lab_name", "must not be empty"));
        }
        Ok(())
    }
}

/// Classes travel as one comma-separated string.
pub(crate) fn join_classes(classes: &[String]) -> String {
    classes
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
