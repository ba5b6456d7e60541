// Maintenance-task endpoints
//
// Task visibility is scoped to lab members, so reads carry the bearer
// token as well as the access key.

use secrecy::SecretString;
use tracing::debug;

use crate::client::{Ack, ApiClient, CredentialMode, Request};
use crate::error::Error;
use crate::models::{TaskCreate, TaskResponse};

impl ApiClient {
    /// `GET /tasks/lab/{id}`
    pub async fn list_lab_tasks(
        &self,
        token: &SecretString,
        lab_id: &str,
    ) -> Result<Vec<TaskResponse>, Error> {
        let request = Request::get(&["tasks", "lab", lab_id], CredentialMode::Both);
        self.dispatch(request, Some(token)).await
    }

    /// `GET /tasks/machine/{key}`
    pub async fn list_machine_tasks(
        &self,
        token: &SecretString,
        machine_key: &str,
    ) -> Result<Vec<TaskResponse>, Error> {
        let request = Request::get(&["tasks", "machine", machine_key], CredentialMode::Both);
        self.dispatch(request, Some(token)).await
    }

    /// Create one task assigned to every machine in `body.machines`.
    ///
    /// `POST /tasks/new`; answers 409 for a duplicate task name.
    pub async fn create_task(&self, token: &SecretString, body: &TaskCreate) -> Result<Ack, Error> {
        debug!(
            lab_id = %body.lab_id,
            task_name = %body.task_name,
            machines = body.machines.len(),
            "creating task"
        );
        let request = Request::post(&["tasks", "new"], CredentialMode::Both).json(body)?;
        self.dispatch_ack(request, Some(token)).await
    }

    /// `PATCH /tasks/complete/{id}`; answers 409 when already complete.
    pub async fn complete_task(&self, token: &SecretString, task_id: i64) -> Result<Ack, Error> {
        debug!(task_id, "completing task");
        let id = task_id.to_string();
        let request = Request::patch(&["tasks", "complete", &id], CredentialMode::Both);
        self.dispatch_ack(request, Some(token)).await
    }
}
