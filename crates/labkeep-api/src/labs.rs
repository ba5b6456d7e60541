// Lab endpoints
//
// Reads need only the access key; every write also needs a bearer token.

use secrecy::SecretString;
use tracing::debug;

use crate::client::{Ack, ApiClient, CredentialMode, Request};
use crate::error::Error;
use crate::models::{LabCreate, LabResponse, LabUpdate, MachineResponse, StudentResponse};

impl ApiClient {
    /// `GET /lab/{id}`
    pub async fn get_lab(&self, lab_id: &str) -> Result<LabResponse, Error> {
        let request = Request::get(&["lab", lab_id], CredentialMode::AccessKey);
        self.dispatch(request, None).await
    }

    /// `POST /lab/new_lab`
    pub async fn create_lab(&self, token: &SecretString, body: &LabCreate) -> Result<Ack, Error> {
        debug!(lab_id = %body.lab_id, "creating lab");
        let request = Request::post(&["lab", "new_lab"], CredentialMode::Both).json(body)?;
        self.dispatch_ack(request, Some(token)).await
    }

    /// `PATCH /lab/update/{id}`
    pub async fn update_lab(
        &self,
        token: &SecretString,
        lab_id: &str,
        body: &LabUpdate,
    ) -> Result<Ack, Error> {
        debug!(lab_id, "updating lab");
        let request =
            Request::patch(&["lab", "update", lab_id], CredentialMode::Both).json(body)?;
        self.dispatch_ack(request, Some(token)).await
    }

    /// `DELETE /lab/delete/{id}`
    pub async fn delete_lab(&self, token: &SecretString, lab_id: &str) -> Result<Ack, Error> {
        debug!(lab_id, "deleting lab");
        let request = Request::delete(&["lab", "delete", lab_id], CredentialMode::Both);
        self.dispatch_ack(request, Some(token)).await
    }

    /// Add the signed-in user to a lab's members.
    ///
    /// `POST /lab/join/{id}`; answers 409 when already a member.
    pub async fn join_lab(&self, token: &SecretString, lab_id: &str) -> Result<Ack, Error> {
        debug!(lab_id, "joining lab");
        let request = Request::post(&["lab", "join", lab_id], CredentialMode::Both);
        self.dispatch_ack(request, Some(token)).await
    }

    /// `GET /lab/{id}/machines`
    pub async fn list_lab_machines(&self, lab_id: &str) -> Result<Vec<MachineResponse>, Error> {
        let request = Request::get(&["lab", lab_id, "machines"], CredentialMode::AccessKey);
        self.dispatch(request, None).await
    }

    /// `GET /lab/{id}/students`
    pub async fn list_lab_students(&self, lab_id: &str) -> Result<Vec<StudentResponse>, Error> {
        let request = Request::get(&["lab", lab_id, "students"], CredentialMode::AccessKey);
        self.dispatch(request, None).await
    }
}
