// Machine configuration endpoints
//
// The date and cleanliness values are sent exactly as given; validation
// happens one layer up, before a request is ever built.

use secrecy::SecretString;
use tracing::debug;

use crate::client::{Ack, ApiClient, CredentialMode, Request};
use crate::error::Error;
use crate::models::{CleanlinessUpdate, LastCheckUpdate, MachineResponse};

impl ApiClient {
    /// `GET /machine_config/{key}`
    ///
    /// The response omits the key, so it is filled in from the request.
    pub async fn get_machine(&self, machine_key: &str) -> Result<MachineResponse, Error> {
        let request = Request::get(&["machine_config", machine_key], CredentialMode::AccessKey);
        let mut machine: MachineResponse = self.dispatch(request, None).await?;
        machine
            .machine_key
            .get_or_insert_with(|| machine_key.to_owned());
        Ok(machine)
    }

    /// `PATCH /machine_config/update/{key}/last_check` with `{"last_checked": "dd/mm/yyyy"}`
    pub async fn update_last_check(
        &self,
        token: &SecretString,
        machine_key: &str,
        last_checked: &str,
    ) -> Result<Ack, Error> {
        debug!(machine_key, last_checked, "updating last check date");
        let request = Request::patch(
            &["machine_config", "update", machine_key, "last_check"],
            CredentialMode::Both,
        )
        .json(&LastCheckUpdate { last_checked })?;
        self.dispatch_ack(request, Some(token)).await
    }

    /// `PATCH /machine_config/update/{key}/state_cleanliness` with `{"state_cleanliness": "BOM"}`
    pub async fn update_cleanliness(
        &self,
        token: &SecretString,
        machine_key: &str,
        state: &str,
    ) -> Result<Ack, Error> {
        debug!(machine_key, state, "updating cleanliness state");
        let request = Request::patch(
            &["machine_config", "update", machine_key, "state_cleanliness"],
            CredentialMode::Both,
        )
        .json(&CleanlinessUpdate {
            state_cleanliness: state,
        })?;
        self.dispatch_ack(request, Some(token)).await
    }
}
