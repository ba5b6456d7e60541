// ── Task domain types ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Task lifecycle. `Complete` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum TaskStatus {
    Pending,
    Complete,
}

/// A maintenance task assigned to one or more machines of a lab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: i64,
    pub task_name: String,
    pub task_description: String,
    pub created_on: Option<NaiveDate>,
    pub is_complete: bool,
    pub machine_keys: Vec<String>,
    pub machine_names: Vec<String>,
    pub lab_id: Option<String>,
}

impl Task {
    pub fn status(&self) -> TaskStatus {
        if self.is_complete {
            TaskStatus::Complete
        } else {
            TaskStatus::Pending
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.is_complete
    }
}

/// Request to create a task across several machines at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub lab_id: String,
    pub name: String,
    pub description: String,
    pub machine_keys: Vec<String>,
}

impl NewTask {
    /// Trim fields and drop duplicate or blank machine keys, keeping order.
    pub(crate) fn normalized(self) -> Result<Self, CoreError> {
        let lab_id = self.lab_id.trim().to_owned();
        if lab_id.is_empty() {
            return Err(CoreError::validation("lab_id", "must not be empty"));
        }
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(CoreError::validation("task_name", "must not be empty"));
        }

        let mut machine_keys: Vec<String> = Vec::with_capacity(self.machine_keys.len());
        for key in self.machine_keys {
            let key = key.trim();
            if !key.is_empty() && !machine_keys.iter().any(|k| k == key) {
                machine_keys.push(key.to_owned());
            }
        }
        if machine_keys.is_empty() {
            return Err(CoreError::validation(
                "machines",
                "select at least one machine",
            ));
        }

        Ok(Self {
            lab_id,
            name,
            description: self.description.trim().to_owned(),
            machine_keys,
        })
    }
}
