// Token exchange, registration, and user-profile endpoints.
//
// The token exchange is form-encoded (OAuth2 password flow); everything
// else speaks JSON.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::{Ack, ApiClient, CredentialMode, Request};
use crate::error::Error;
use crate::models::{LabResponse, RegisterRequest, TokenResponse, UserResponse};

/// Shown when the token endpoint rejects credentials without a `detail`.
pub const LOGIN_FAILED: &str = "login failed: check username and password";

impl ApiClient {
    /// Exchange username/password for a bearer token.
    ///
    /// `POST /auth/token` (form: `username`, `password`)
    pub async fn request_token(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<TokenResponse, Error> {
        debug!(username, "requesting bearer token");
        let request = Request::post(&["auth", "token"], CredentialMode::None)
            .form(vec![
                ("username".to_owned(), username.to_owned()),
                ("password".to_owned(), password.expose_secret().to_owned()),
            ])
            .fallback(LOGIN_FAILED);
        self.dispatch(request, None).await
    }

    /// Create an account. Does not sign in.
    ///
    /// `POST /auth/register`
    pub async fn register(&self, username: &str, password: &SecretString) -> Result<Ack, Error> {
        debug!(username, "registering user");
        let request = Request::post(&["auth", "register"], CredentialMode::None).json(
            &RegisterRequest {
                username,
                password: password.expose_secret(),
            },
        )?;
        self.dispatch_ack(request, None).await
    }

    /// Profile of the token's owner.
    ///
    /// `GET /users/me/`
    pub async fn current_user(&self, token: &SecretString) -> Result<UserResponse, Error> {
        let request = Request::get(&["users", "me", ""], CredentialMode::Token);
        self.dispatch(request, Some(token)).await
    }

    /// Profile of any user by id.
    ///
    /// `GET /users/{id}`
    pub async fn get_user(
        &self,
        token: &SecretString,
        user_id: i64,
    ) -> Result<UserResponse, Error> {
        let id = user_id.to_string();
        let request = Request::get(&["users", &id], CredentialMode::Token);
        self.dispatch(request, Some(token)).await
    }

    /// Labs the signed-in user is a member of.
    ///
    /// `GET /users/me/labs`
    pub async fn list_my_labs(&self, token: &SecretString) -> Result<Vec<LabResponse>, Error> {
        let request = Request::get(&["users", "me", "labs"], CredentialMode::Token);
        self.dispatch(request, Some(token)).await
    }
}
