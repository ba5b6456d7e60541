//! Async client for the lab-management REST service.
//!
//! [`ApiClient`] dispatches every call through one path that attaches the
//! bearer token and/or the static `api-key` header and normalizes server
//! errors into [`Error`]. Endpoint methods live in per-resource modules as
//! `impl ApiClient` blocks and return the wire types in [`models`].

pub mod auth;
pub mod client;
pub mod error;
pub mod labs;
pub mod machines;
pub mod models;
pub mod sessions;
pub mod tasks;
pub mod transport;

pub use client::{ACCESS_KEY_HEADER, Ack, ApiClient, CredentialMode, Request};
pub use error::Error;
pub use sessions::SessionScope;
pub use transport::{TlsMode, TransportConfig};
