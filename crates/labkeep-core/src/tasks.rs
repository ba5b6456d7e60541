// ── Task state coordinator ──
//
// Pending -> Complete, nothing else. Writes never touch a local copy: the
// coordinator re-reads the affected task list and returns it alongside the
// server's message.

use tracing::info;

use labkeep_api::models::TaskCreate;

use crate::controller::Controller;
use crate::error::CoreError;
use crate::model::{NewTask, Task};
use crate::notice::WriteOutcome;

/// Which task list a write should refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskScope {
    Lab(String),
    Machine(String),
}

/// Outcome of [`TaskCoordinator::create_task`].
#[derive(Debug)]
pub struct TaskCreated {
    pub outcome: WriteOutcome<Vec<Task>>,
    /// The new task, located in the refreshed list by name.
    pub task: Option<Task>,
}

pub struct TaskCoordinator<'a> {
    controller: &'a Controller,
}

impl<'a> TaskCoordinator<'a> {
    pub(crate) fn new(controller: &'a Controller) -> Self {
        Self { controller }
    }

    pub async fn list(&self, scope: &TaskScope) -> Result<Vec<Task>, CoreError> {
        match scope {
            TaskScope::Lab(lab_id) => self.controller.list_lab_tasks(lab_id).await,
            TaskScope::Machine(key) => self.controller.list_machine_tasks(key).await,
        }
    }

    /// Create one task across `task.machine_keys` in a single request.
    ///
    /// A duplicate task name comes back as [`CoreError::Conflict`].
    pub async fn create_task(&self, task: NewTask) -> Result<TaskCreated, CoreError> {
        let task = task.normalized()?;
        let token = self.controller.token()?;

        let body = TaskCreate {
            lab_id: task.lab_id.clone(),
            task_name: task.name.clone(),
            task_description: task.description,
            machines: task.machine_keys,
        };
        let ack = self.controller.api().create_task(&token, &body).await?;
        info!(lab_id = %body.lab_id, task_name = %body.task_name, "task created");

        let outcome = WriteOutcome::new(
            ack.message_or("Task created"),
            self.list(&TaskScope::Lab(task.lab_id)).await,
        );
        let created = outcome.fresh().and_then(|tasks| {
            tasks
                .iter()
                .rev()
                .find(|t| t.task_name.eq_ignore_ascii_case(&task.name))
                .cloned()
        });
        Ok(TaskCreated {
            outcome,
            task: created,
        })
    }

    /// Mark a task complete and re-read `refresh`.
    ///
    /// Completing an already-complete task is a [`CoreError::Conflict`];
    /// local state is never flipped ahead of the server.
    pub async fn complete_task(
        &self,
        task_id: i64,
        refresh: &TaskScope,
    ) -> Result<WriteOutcome<Vec<Task>>, CoreError> {
        let token = self.controller.token()?;
        let ack = self.controller.api().complete_task(&token, task_id).await?;
        info!(task_id, "task completed");
        Ok(WriteOutcome::new(
            ack.message_or("Task completed"),
            self.list(refresh).await,
        ))
    }
}
