//! Account operations against the hosted service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{Backend, BackendError};
use crate::sources::AccountService;

/// Id literal that asks the service to mint a unique account id.
const UNIQUE_ID: &str = "unique()";

/// An account as the service reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Service-assigned account id.
    #[serde(rename = "$id")]
    pub id: String,
    /// When the account was created.
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Display name chosen at signup.
    #[serde(default)]
    pub name: String,
    /// Email the account was registered with.
    #[serde(default)]
    pub email: String,
    /// Open preference mapping; the club scope lives under `clubId`.
    #[serde(default)]
    pub prefs: Map<String, Value>,
}

/// Session record returned by session creation. Only the secret matters to
/// this client; it authenticates every subsequent request.
#[derive(Debug, Deserialize)]
struct Session {
    #[serde(default)]
    secret: String,
}

#[async_trait]
impl AccountService for Backend {
    async fn current_account(&self) -> Result<Account, BackendError> {
        let response = self.request(Method::GET, "account").send().await?;
        Self::decode(response).await
    }

    async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), BackendError> {
        let body = json!({
            "userId": UNIQUE_ID,
            "email": email,
            "password": password,
            "name": name,
        });

        let response = self
            .request(Method::POST, "account")
            .json(&body)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    async fn create_email_session(&self, email: &str, password: &str) -> Result<(), BackendError> {
        let body = json!({ "email": email, "password": password });

        let response = self
            .request(Method::POST, "account/sessions/email")
            .json(&body)
            .send()
            .await?;
        let session: Session = Self::decode(response).await?;

        // Some deployments deliver the session only as a cookie; keep the
        // secret header path when the body carries one.
        if !session.secret.is_empty() {
            self.store_session_secret(Some(SecretString::from(session.secret)));
        }

        Ok(())
    }

    async fn update_preferences(&self, prefs: &Map<String, Value>) -> Result<(), BackendError> {
        let body = json!({ "prefs": prefs });

        let response = self
            .request(Method::PATCH, "account/prefs")
            .json(&body)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    async fn delete_current_session(&self) -> Result<(), BackendError> {
        let result = self
            .request(Method::DELETE, "account/sessions/current")
            .send()
            .await;

        // The local secret is dropped no matter what the service said; once
        // deletion was requested, local state is authoritative.
        self.store_session_secret(None);

        Self::expect_success(result?).await
    }
}
