// ── Controller facade ──
//
// Single entry point for consumers. Owns the API client and the session
// store, exposes typed resource accessors, and hands out the task and
// machine coordinators. Every read goes straight to the server; nothing
// is cached between calls.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, info};

use labkeep_api::models::{LabCreate, LabUpdate};
use labkeep_api::transport::{TlsMode, TransportConfig};
use labkeep_api::{ApiClient, SessionScope};

use crate::config::{ClientConfig, TlsVerification};
use crate::convert;
use crate::error::CoreError;
use crate::machines::MachineCoordinator;
use crate::model::lab::join_classes;
use crate::model::{Lab, LabChanges, Machine, NewLab, Student, Task, UsageSession, User};
use crate::notice::WriteOutcome;
use crate::session::SessionStore;
use crate::tasks::TaskCoordinator;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ClientConfig,
    api: ApiClient,
    session: SessionStore,
}

impl Controller {
    /// Build the HTTP client for `config`. Does not contact the server.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: tls_to_transport(&config.tls),
            timeout: config.timeout,
        };
        let api = ApiClient::new(config.url.as_str(), &config.access_key, &transport)?;
        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                api,
                session: SessionStore::new(),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub(crate) fn token(&self) -> Result<SecretString, CoreError> {
        self.inner.session.require_token()
    }

    pub fn tasks(&self) -> TaskCoordinator<'_> {
        TaskCoordinator::new(self)
    }

    pub fn machines(&self) -> MachineCoordinator<'_> {
        MachineCoordinator::new(self)
    }

    // ── Session ──────────────────────────────────────────────────────

    pub async fn login(&self, username: &str, password: &SecretString) -> Result<User, CoreError> {
        self.inner.session.login(&self.inner.api, username, password).await
    }

    /// Clears the in-memory session; no network call.
    pub fn logout(&self) -> bool {
        self.inner.session.logout()
    }

    /// Create an account. The caller still has to log in.
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<String, CoreError> {
        if username.trim().is_empty() {
            return Err(CoreError::validation("username", "must not be empty"));
        }
        let ack = self.inner.api.register(username.trim(), password).await?;
        info!(username, "registered account");
        Ok(ack.message_or("Account created"))
    }

    /// Re-read `GET /users/me/` and replace the cached profile.
    pub async fn refresh_profile(&self) -> Result<User, CoreError> {
        let token = self.token()?;
        let user = User::from(self.inner.api.current_user(&token).await?);
        self.inner.session.replace_user(user.clone());
        Ok(user)
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, CoreError> {
        let token = self.token()?;
        Ok(self.inner.api.get_user(&token, user_id).await?.into())
    }

    // ── Labs ─────────────────────────────────────────────────────────

    /// Labs the signed-in user belongs to.
    pub async fn list_my_labs(&self) -> Result<Vec<Lab>, CoreError> {
        let token = self.token()?;
        let labs = self.inner.api.list_my_labs(&token).await?;
        debug!(count = labs.len(), "loaded labs");
        Ok(convert::collect(labs))
    }

    pub async fn get_lab(&self, lab_id: &str) -> Result<Lab, CoreError> {
        Ok(self.inner.api.get_lab(lab_id).await?.into())
    }

    /// Create a lab, then re-read the user's lab list.
    pub async fn create_lab(&self, lab: NewLab) -> Result<WriteOutcome<Vec<Lab>>, CoreError> {
        lab.validate()?;
        let token = self.token()?;
        let body = LabCreate {
            lab_id: lab.lab_id.trim().to_owned(),
            lab_name: lab.lab_name.trim().to_owned(),
            classes: join_classes(&lab.classes),
        };
        let ack = self.inner.api.create_lab(&token, &body).await?;
        info!(lab_id = %body.lab_id, "lab created");
        Ok(WriteOutcome::new(
            ack.message_or("Lab created"),
            self.list_my_labs().await,
        ))
    }

    /// Rename a lab or replace its classes, then re-read it.
    pub async fn update_lab(
        &self,
        lab_id: &str,
        changes: LabChanges,
    ) -> Result<WriteOutcome<Lab>, CoreError> {
        changes.validate()?;
        let token = self.token()?;
        let body = LabUpdate {
            lab_name: changes.lab_name.map(|n| n.trim().to_owned()),
            classes: changes.classes.as_deref().map(join_classes),
        };
        let ack = self.inner.api.update_lab(&token, lab_id, &body).await?;
        info!(lab_id, "lab updated");
        Ok(WriteOutcome::new(
            ack.message_or("Lab updated"),
            self.get_lab(lab_id).await,
        ))
    }

    pub async fn delete_lab(&self, lab_id: &str) -> Result<WriteOutcome<Vec<Lab>>, CoreError> {
        let token = self.token()?;
        let ack = self.inner.api.delete_lab(&token, lab_id).await?;
        info!(lab_id, "lab deleted");
        Ok(WriteOutcome::new(
            ack.message_or("Lab deleted"),
            self.list_my_labs().await,
        ))
    }

    /// Join a lab, then re-read the user's lab list.
    ///
    /// Joining twice fails with [`CoreError::Conflict`] and sends no refresh.
    pub async fn join_lab(&self, lab_id: &str) -> Result<WriteOutcome<Vec<Lab>>, CoreError> {
        let lab_id = lab_id.trim();
        if lab_id.is_empty() {
            return Err(CoreError::validation("lab_id", "must not be empty"));
        }
        let token = self.token()?;
        let ack = self.inner.api.join_lab(&token, lab_id).await?;
        info!(lab_id, "joined lab");
        Ok(WriteOutcome::new(
            ack.message_or("Joined lab"),
            self.list_my_labs().await,
        ))
    }

    // ── Machines / students ──────────────────────────────────────────

    pub async fn list_lab_machines(&self, lab_id: &str) -> Result<Vec<Machine>, CoreError> {
        convert::machines(self.inner.api.list_lab_machines(lab_id).await?)
    }

    pub async fn get_machine(&self, machine_key: &str) -> Result<Machine, CoreError> {
        Machine::try_from(self.inner.api.get_machine(machine_key).await?)
    }

    pub async fn list_lab_students(&self, lab_id: &str) -> Result<Vec<Student>, CoreError> {
        Ok(convert::collect(self.inner.api.list_lab_students(lab_id).await?))
    }

    // ── Sessions ─────────────────────────────────────────────────────

    pub async fn list_lab_sessions(&self, lab_id: &str) -> Result<Vec<UsageSession>, CoreError> {
        self.sessions(SessionScope::Lab(lab_id)).await
    }

    pub async fn list_machine_sessions(
        &self,
        machine_key: &str,
    ) -> Result<Vec<UsageSession>, CoreError> {
        self.sessions(SessionScope::Machine(machine_key)).await
    }

    pub async fn list_student_sessions(
        &self,
        student_id: i64,
    ) -> Result<Vec<UsageSession>, CoreError> {
        self.sessions(SessionScope::Student(student_id)).await
    }

    async fn sessions(&self, scope: SessionScope<'_>) -> Result<Vec<UsageSession>, CoreError> {
        Ok(convert::collect(self.inner.api.list_sessions(scope).await?))
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub async fn list_lab_tasks(&self, lab_id: &str) -> Result<Vec<Task>, CoreError> {
        let token = self.token()?;
        Ok(convert::collect(
            self.inner.api.list_lab_tasks(&token, lab_id).await?,
        ))
    }

    pub async fn list_machine_tasks(&self, machine_key: &str) -> Result<Vec<Task>, CoreError> {
        let token = self.token()?;
        Ok(convert::collect(
            self.inner.api.list_machine_tasks(&token, machine_key).await?,
        ))
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
