// Usage-session endpoints (read-only)
//
// The server answers 404 when a scope simply has no sessions yet, so an
// empty history is reported as an empty list rather than an error.

use crate::client::{ApiClient, CredentialMode, Request};
use crate::error::Error;
use crate::models::SessionResponse;

/// Which resource a session listing is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionScope<'a> {
    Lab(&'a str),
    Machine(&'a str),
    Student(i64),
}

impl ApiClient {
    /// `GET /session/lab/{id}`, `GET /session/machine/{key}`, `GET /session/student/{id}`
    pub async fn list_sessions(
        &self,
        scope: SessionScope<'_>,
    ) -> Result<Vec<SessionResponse>, Error> {
        let student_id;
        let (kind, id) = match scope {
            SessionScope::Lab(lab_id) => ("lab", lab_id),
            SessionScope::Machine(key) => ("machine", key),
            SessionScope::Student(id) => {
                student_id = id.to_string();
                ("student", student_id.as_str())
            }
        };
        let request = Request::get(&["session", kind, id], CredentialMode::AccessKey);
        match self.dispatch(request, None).await {
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            other => other,
        }
    }
}
