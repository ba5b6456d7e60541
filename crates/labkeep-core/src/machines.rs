// ── Machine state coordinator ──
//
// Cleanliness and last-inspection updates. Input is validated before the
// session is even consulted, so a malformed value never reaches the wire.

use tracing::info;

use crate::controller::Controller;
use crate::error::CoreError;
use crate::model::{CheckDate, CleanlinessState, Machine};
use crate::notice::WriteOutcome;

/// Result of a last-check update: the accepted date, for local patching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCheckUpdate {
    pub machine_key: String,
    pub message: String,
    pub accepted: CheckDate,
}

pub struct MachineCoordinator<'a> {
    controller: &'a Controller,
}

impl<'a> MachineCoordinator<'a> {
    pub(crate) fn new(controller: &'a Controller) -> Self {
        Self { controller }
    }

    /// Set the cleanliness state (`BOM`, `REGULAR`, `URGENTE`) and re-read
    /// the machine.
    pub async fn update_cleanliness(
        &self,
        machine_key: &str,
        raw_state: &str,
    ) -> Result<WriteOutcome<Machine>, CoreError> {
        let state = CleanlinessState::parse(raw_state)?;
        let token = self.controller.token()?;

        let ack = self
            .controller
            .api()
            .update_cleanliness(&token, machine_key, state.as_ref())
            .await?;
        info!(machine_key, %state, "cleanliness updated");

        Ok(WriteOutcome::new(
            ack.message_or("Cleanliness updated"),
            self.controller.get_machine(machine_key).await,
        ))
    }

    /// Set the last-inspection date from `dd/mm/yyyy` input.
    ///
    /// No re-read: the caller patches its view with `accepted`.
    pub async fn update_last_check(
        &self,
        machine_key: &str,
        raw_date: &str,
    ) -> Result<LastCheckUpdate, CoreError> {
        let accepted = CheckDate::parse(raw_date)?;
        let token = self.controller.token()?;

        let ack = self
            .controller
            .api()
            .update_last_check(&token, machine_key, &accepted.to_string())
            .await?;
        info!(machine_key, last_checked = %accepted, "last check updated");

        Ok(LastCheckUpdate {
            machine_key: machine_key.to_owned(),
            message: ack.message_or("Last check updated"),
            accepted,
        })
    }
}
