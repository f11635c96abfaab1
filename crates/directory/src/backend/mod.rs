//! REST client for the hosted account + document service.
//!
//! # Architecture
//!
//! - The backend is source of truth - NO local persistence, direct API calls
//! - One shared [`Backend`] client carries the project header and, once a
//!   session exists, the session secret for every request
//! - Account operations and document listing live in submodules; both are
//!   exposed through the trait seams in [`crate::sources`]
//!
//! # Wire contract
//!
//! The service speaks the Appwrite-style REST dialect the original mobile
//! client used: `$`-prefixed system fields on documents, a JSON error body
//! with a machine-readable `type`, and equality predicates passed as
//! `queries[]` parameters.

mod account;
mod records;

pub use account::Account;
pub use records::{CLUB_ATTRIBUTE, DocumentList, MemberDocument, Query};

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::DirectoryConfig;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The service answered with an error body.
    #[error("{kind}: {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Machine-readable error type from the service.
        kind: String,
        /// Human-readable message from the service.
        message: String,
    },
}

/// JSON error body returned by the service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    kind: String,
}

impl BackendError {
    fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(err) if !err.kind.is_empty() => Self::Api {
                status,
                kind: err.kind,
                message: err.message,
            },
            _ => Self::Api {
                status,
                kind: "unknown".to_owned(),
                message: if body.is_empty() {
                    "(empty response body)".to_owned()
                } else {
                    body.chars().take(200).collect()
                },
            },
        }
    }

    fn api_kind(&self) -> Option<(&str, u16, &str)> {
        match self {
            Self::Api {
                status,
                kind,
                message,
            } => Some((kind.as_str(), *status, message.as_str())),
            _ => None,
        }
    }

    /// Wrong email/password combination.
    #[must_use]
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self.api_kind(), Some(("user_invalid_credentials", _, _)))
    }

    /// An account with this email already exists.
    #[must_use]
    pub fn is_duplicate_email(&self) -> bool {
        matches!(
            self.api_kind(),
            Some(("user_already_exists" | "user_email_already_exists", _, _))
        )
    }

    /// The service rejected the password as too weak.
    #[must_use]
    pub fn is_weak_password(&self) -> bool {
        match self.api_kind() {
            Some(("user_password_policy_violation", _, _)) => true,
            Some(("general_argument_invalid", _, message)) => {
                message.to_lowercase().contains("password")
            }
            _ => false,
        }
    }

    /// No active session (guest scope, expired or missing token).
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        match self.api_kind() {
            Some((kind, status, _)) => {
                status == 401 || kind == "general_unauthorized_scope" || kind == "user_unauthorized"
            }
            None => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Client
// ─────────────────────────────────────────────────────────────────────────────

/// Shared client for the hosted backend.
///
/// Cheaply cloneable; all clones share one HTTP connection pool and one
/// session secret. The secret is captured by a successful session creation
/// and cleared again on session deletion.
#[derive(Clone)]
pub struct Backend {
    inner: Arc<BackendInner>,
}

struct BackendInner {
    http: reqwest::Client,
    config: DirectoryConfig,
    session: RwLock<Option<SecretString>>,
}

impl Backend {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &DirectoryConfig) -> Self {
        Self {
            inner: Arc::new(BackendInner {
                http: reqwest::Client::new(),
                config: config.clone(),
                session: RwLock::new(None),
            }),
        }
    }

    /// Whether a session secret is currently held.
    #[must_use]
    pub fn has_session_secret(&self) -> bool {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(crate) fn config(&self) -> &DirectoryConfig {
        &self.inner.config
    }

    pub(crate) fn store_session_secret(&self, secret: Option<SecretString>) {
        *self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = secret;
    }

    /// Build a request with the project header and, when present, the
    /// session secret attached.
    pub(crate) fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/{path}",
            self.inner.config.endpoint.as_str().trim_end_matches('/')
        );

        let mut request = self
            .inner
            .http
            .request(method, url)
            .header("X-Appwrite-Project", &self.inner.config.project_id)
            .header("Content-Type", "application/json");

        let session = self
            .inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(secret) = session.as_ref() {
            request = request.header("X-Appwrite-Session", secret.expose_secret());
        }

        request
    }

    /// Check the response status and decode the body.
    pub(crate) async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        Ok(Self::check(response).await?.json().await?)
    }

    /// Check the response status, discarding any body on success.
    pub(crate) async fn expect_success(response: reqwest::Response) -> Result<(), BackendError> {
        Self::check(response).await.map(|_| ())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(BackendError::from_response(status.as_u16(), &body))
    }
}
