// ── Session store ──
//
// Owns the bearer token and the signed-in user's profile. Explicit, not
// ambient: the controller holds one and every accessor consults it. Reads
// are lock-free through `ArcSwapOption`.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;
use tracing::{debug, info};

use labkeep_api::ApiClient;

use crate::error::CoreError;
use crate::model::User;

/// A signed-in session: bearer token plus profile snapshot.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: SecretString,
    pub user: User,
}

/// Holds at most one [`AuthSession`].
#[derive(Default)]
pub struct SessionStore {
    current: ArcSwapOption<AuthSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exchange credentials for a token, fetch the profile, and keep both.
    ///
    /// Nothing is stored unless both steps succeed; a failed attempt leaves
    /// any existing session untouched.
    pub async fn login(
        &self,
        api: &ApiClient,
        username: &str,
        password: &SecretString,
    ) -> Result<User, CoreError> {
        let token = api.request_token(username, password).await?;
        let token = SecretString::from(token.access_token);
        let user = User::from(api.current_user(&token).await?);

        self.current.store(Some(Arc::new(AuthSession {
            token,
            user: user.clone(),
        })));
        info!(username = %user.username, user_id = user.id, "signed in");
        Ok(user)
    }

    /// Drop the token and profile. Returns whether a session existed.
    pub fn logout(&self) -> bool {
        let had_session = self.current.swap(None).is_some();
        if had_session {
            info!("signed out");
        }
        had_session
    }

    /// Re-hydrate a previously persisted session.
    pub fn restore(&self, token: SecretString, user: User) {
        debug!(username = %user.username, "restoring session");
        self.current.store(Some(Arc::new(AuthSession { token, user })));
    }

    /// The current session, for persistence.
    pub fn snapshot(&self) -> Option<Arc<AuthSession>> {
        self.current.load_full()
    }

    pub fn current_token(&self) -> Option<SecretString> {
        self.current.load_full().map(|s| s.token.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.load_full().map(|s| s.user.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.load_full().is_some()
    }

    /// Token for an operation that cannot run signed out.
    pub fn require_token(&self) -> Result<SecretString, CoreError> {
        self.current_token().ok_or(CoreError::NotSignedIn)
    }

    /// Swap in a newer profile while keeping the token.
    pub(crate) fn replace_user(&self, user: User) {
        self.current.rcu(|current| {
            current.as_ref().map(|s| {
                Arc::new(AuthSession {
                    token: s.token.clone(),
                    user: user.clone(),
                })
            })
        });
    }
}
