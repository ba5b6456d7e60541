// Uniform request dispatch for the lab-management REST service.
//
// Every resource accessor builds a `Request` and hands it to
// `ApiClient::dispatch` / `ApiClient::dispatch_ack`, which attach
// credentials, send, and normalize non-2xx responses into `Error`.
//
// Auth: `Authorization: Bearer <token>` and/or the static `api-key` header.

use std::fmt;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::MessageResponse;
use crate::transport::TransportConfig;

/// Header carrying the static, externally provisioned access key.
pub const ACCESS_KEY_HEADER: &str = "api-key";

/// Last-resort message when neither the server nor the transport says anything.
pub const GENERIC_FAILURE: &str = "unknown error";

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<Detail>,
}

// FastAPI answers `{"detail": "..."}` for HTTPException and
// `{"detail": [{"msg": "...", ...}]}` for request validation failures.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Detail {
    Text(String),
    Items(Vec<DetailItem>),
    #[allow(dead_code)]
    Other(serde_json::Value),
}

#[derive(serde::Deserialize)]
struct DetailItem {
    #[serde(default)]
    msg: Option<String>,
}

/// Extract the most specific human-readable message from an error body.
///
/// Order: `message`, then a string `detail`, then the first `detail[].msg`.
pub(crate) fn server_message(raw: &str) -> Option<String> {
    let parsed: ErrorResponse = serde_json::from_str(raw).ok()?;
    let non_empty = |s: String| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    };

    if let Some(message) = parsed.message.and_then(non_empty) {
        return Some(message);
    }
    match parsed.detail? {
        Detail::Text(text) => non_empty(text),
        Detail::Items(items) => items
            .into_iter()
            .next()
            .and_then(|item| item.msg)
            .and_then(non_empty),
        Detail::Other(_) => None,
    }
}

// ── Request spec ─────────────────────────────────────────────────────

/// Which credentials an endpoint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// Public endpoint (token exchange, registration).
    None,
    /// Bearer token only.
    Token,
    /// Static access key only.
    AccessKey,
    /// Access key plus bearer token (all writes).
    Both,
}

impl CredentialMode {
    pub fn needs_token(self) -> bool {
        matches!(self, Self::Token | Self::Both)
    }

    pub fn needs_access_key(self) -> bool {
        matches!(self, Self::AccessKey | Self::Both)
    }
}

enum Body {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// Declarative description of one API call.
///
/// Path segments are percent-encoded individually, so user-chosen lab ids
/// and machine keys can never escape their segment.
pub struct Request {
    method: Method,
    segments: Vec<String>,
    credentials: CredentialMode,
    body: Option<Body>,
    fallback: Option<&'static str>,
}

impl Request {
    pub fn new(method: Method, segments: &[&str], credentials: CredentialMode) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| (*s).to_owned()).collect(),
            credentials,
            body: None,
            fallback: None,
        }
    }

    pub fn get(segments: &[&str], credentials: CredentialMode) -> Self {
        Self::new(Method::GET, segments, credentials)
    }

    pub fn post(segments: &[&str], credentials: CredentialMode) -> Self {
        Self::new(Method::POST, segments, credentials)
    }

    pub fn patch(segments: &[&str], credentials: CredentialMode) -> Self {
        Self::new(Method::PATCH, segments, credentials)
    }

    pub fn delete(segments: &[&str], credentials: CredentialMode) -> Self {
        Self::new(Method::DELETE, segments, credentials)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        let value = serde_json::to_value(body).map_err(|e| Error::Encode(e.to_string()))?;
        self.body = Some(Body::Json(value));
        Ok(self)
    }

    /// Attach a form-encoded body.
    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = Some(Body::Form(pairs));
        self
    }

    /// Message used when the server error carries none of its own.
    pub fn fallback(mut self, message: &'static str) -> Self {
        self.fallback = Some(message);
        self
    }

    pub fn credentials(&self) -> CredentialMode {
        self.credentials
    }
}

// Bodies may hold passwords; never print them.
impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("segments", &self.segments)
            .field("credentials", &self.credentials)
            .field("has_body", &self.body.is_some())
            .finish_non_exhaustive()
    }
}

/// Acknowledgement of a write: the server's `message`, when it sent one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    pub message: Option<String>,
}

impl Ack {
    fn from_body(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        let message = serde_json::from_str::<MessageResponse>(trimmed)
            .ok()
            .and_then(|r| r.message)
            .or_else(|| serde_json::from_str::<String>(trimmed).ok());
        Self { message }
    }

    /// The server message, or `default` when the body was empty.
    pub fn message_or(&self, default: &str) -> String {
        self.message.clone().unwrap_or_else(|| default.to_owned())
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the lab-management API.
///
/// Holds the static access key; bearer tokens are passed per call so the
/// session store stays the single owner of the signed-in state.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    access_key: HeaderValue,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client with its own `reqwest::Client` from `transport`.
    pub fn new(
        base_url: &str,
        access_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, access_key, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        base_url: &str,
        access_key: &SecretString,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        let mut access_key = HeaderValue::from_str(access_key.expose_secret()).map_err(|e| {
            Error::InvalidHeader {
                header: ACCESS_KEY_HEADER,
                reason: e.to_string(),
            }
        })?;
        access_key.set_sensitive(true);

        Ok(Self {
            http,
            base_url,
            access_key,
        })
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let url = Url::parse(raw.trim())?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidBaseUrl(raw.to_owned()));
        }
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL, keeping any base prefix.
    ///
    /// A trailing empty segment produces a trailing slash (`users/me/`).
    pub(crate) fn url(&self, segments: &[String]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    fn bearer(token: &SecretString) -> Result<HeaderValue, Error> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::InvalidHeader {
                header: "Authorization",
                reason: e.to_string(),
            })?;
        value.set_sensitive(true);
        Ok(value)
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Send `request` and decode the JSON response body into `T`.
    pub async fn dispatch<T: DeserializeOwned>(
        &self,
        request: Request,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let resp = self.send(request, token).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = body
                .char_indices()
                .nth(200)
                .map_or(body.as_str(), |(end, _)| &body[..end]);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// Send a write `request` whose response is `{"message": ...}` or empty.
    pub async fn dispatch_ack(
        &self,
        request: Request,
        token: Option<&SecretString>,
    ) -> Result<Ack, Error> {
        let resp = self.send(request, token).await?;
        let body = resp.text().await?;
        Ok(Ack::from_body(&body))
    }

    async fn send(
        &self,
        request: Request,
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, Error> {
        let Request {
            method,
            segments,
            credentials,
            body,
            fallback,
        } = request;

        if credentials.needs_token() && token.is_none() {
            return Err(Error::MissingToken);
        }

        let url = self.url(&segments)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, Self::bearer(token)?);
        }
        if credentials.needs_access_key() {
            builder = builder.header(ACCESS_KEY_HEADER, self.access_key.clone());
        }
        builder = match body {
            Some(Body::Json(value)) => builder.json(&value),
            Some(Body::Form(pairs)) => builder.form(&pairs),
            None => builder,
        };

        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(Self::parse_error(status, resp, fallback).await)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn parse_error(
        status: StatusCode,
        resp: reqwest::Response,
        fallback: Option<&'static str>,
    ) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = normalize_message(status, &raw, fallback);

        match status {
            StatusCode::UNAUTHORIZED => Error::Authentication { message },
            StatusCode::NOT_FOUND => Error::NotFound { message },
            StatusCode::CONFLICT => Error::Conflict { message },
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Pick the message for a failed response: server text, then the request's
/// own fallback, then the status line, then [`GENERIC_FAILURE`].
pub(crate) fn normalize_message(
    status: StatusCode,
    raw: &str,
    fallback: Option<&'static str>,
) -> String {
    server_message(raw)
        .or_else(|| fallback.map(str::to_owned))
        .or_else(|| {
            status
                .canonical_reason()
                .map(|reason| format!("request failed with status {} {reason}", status.as_u16()))
        })
        .unwrap_or_else(|| GENERIC_FAILURE.to_owned())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(
            base,
            &SecretString::from("key".to_owned()),
            reqwest::Client::new(),
        )
        .unwrap()
    }

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn url_keeps_base_prefix_and_trailing_slash() {
        let c = client("http://lab.local:8000/api/");
        let url = c.url(&segs(&["users", "me", ""])).unwrap();
        assert_eq!(url.as_str(), "http://lab.local:8000/api/users/me/");

        let c = client("http://lab.local:8000");
        let url = c.url(&segs(&["lab", "sala 1"])).unwrap();
        assert_eq!(url.as_str(), "http://lab.local:8000/lab/sala%201");
    }

    #[test]
    fn segment_cannot_escape_path() {
        let c = client("http://lab.local");
        let url = c.url(&segs(&["lab", "../users/me"])).unwrap();
        assert_eq!(url.path(), "/lab/..%2Fusers%2Fme");
    }

    #[test]
    fn rejects_non_hierarchical_base() {
        let result = ApiClient::with_client(
            "mailto:ops@example.com",
            &SecretString::from("key".to_owned()),
            reqwest::Client::new(),
        );
        assert!(matches!(result, Err(Error::InvalidBaseUrl(_))));
    }

    #[test]
    fn message_prefers_server_fields_in_order() {
        assert_eq!(
            server_message(r#"{"message":"Tarefa criada já existe","detail":"x"}"#).as_deref(),
            Some("Tarefa criada já existe")
        );
        assert_eq!(
            server_message(r#"{"detail":"Incorrect username or password"}"#).as_deref(),
            Some("Incorrect username or password")
        );
        assert_eq!(
            server_message(r#"{"detail":[{"loc":["body"],"msg":"field required"}]}"#).as_deref(),
            Some("field required")
        );
        assert_eq!(server_message(r#"{"detail":{"code":1}}"#), None);
        assert_eq!(server_message("<html>bad gateway</html>"), None);
    }

    #[test]
    fn message_falls_back_to_request_then_status() {
        let msg = normalize_message(StatusCode::UNAUTHORIZED, "", Some("login failed"));
        assert_eq!(msg, "login failed");

        let msg = normalize_message(StatusCode::BAD_GATEWAY, "", None);
        assert_eq!(msg, "request failed with status 502 Bad Gateway");

        let odd = StatusCode::from_u16(599).unwrap();
        assert_eq!(normalize_message(odd, "", None), GENERIC_FAILURE);
    }

    #[test]
    fn ack_tolerates_empty_and_plain_bodies() {
        assert_eq!(Ack::from_body(""), Ack::default());
        assert_eq!(
            Ack::from_body(r#"{"message":"Task completed"}"#).message.as_deref(),
            Some("Task completed")
        );
        assert_eq!(
            Ack::from_body(r#""ok""#).message.as_deref(),
            Some("ok")
        );
        assert_eq!(Ack::from_body("null").message, None);
    }

    #[test]
    fn credential_modes() {
        assert!(CredentialMode::Both.needs_token());
        assert!(CredentialMode::Both.needs_access_key());
        assert!(!CredentialMode::AccessKey.needs_token());
        assert!(!CredentialMode::Token.needs_access_key());
        assert!(!CredentialMode::None.needs_token());
    }
}
