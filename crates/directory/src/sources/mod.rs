//! Abstract contracts for the external collaborators.
//!
//! The session manager and the directory store are written against these
//! traits rather than the concrete [`Backend`](crate::backend::Backend)
//! client. The backend implements both; the bundled dataset implements
//! [`DocumentSource`] only (it has no accounts).

pub mod bundled;

pub use bundled::BundledRoster;

use async_trait::async_trait;
use serde_json::{Map, Value};

use clubhouse_core::ClubId;

use crate::backend::{Account, BackendError, MemberDocument};

/// The external account service: session lifecycle and account records.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Fetch the account behind the current session.
    ///
    /// # Errors
    ///
    /// Fails when no session is active or the service is unreachable.
    async fn current_account(&self) -> Result<Account, BackendError>;

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Fails on duplicate email, weak password, or network error.
    async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), BackendError>;

    /// Create an email/password session for an existing account.
    ///
    /// # Errors
    ///
    /// Fails on invalid credentials or network error.
    async fn create_email_session(&self, email: &str, password: &str) -> Result<(), BackendError>;

    /// Replace the current account's preference mapping.
    ///
    /// # Errors
    ///
    /// Fails when no session is active or the service is unreachable.
    async fn update_preferences(&self, prefs: &Map<String, Value>) -> Result<(), BackendError>;

    /// Delete the current session.
    ///
    /// # Errors
    ///
    /// Fails when the service is unreachable; local session state is cleared
    /// regardless.
    async fn delete_current_session(&self) -> Result<(), BackendError>;
}

/// The external document source for raw member records.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// List raw member documents, optionally scoped to one club.
    ///
    /// A scope is always a single equality predicate on the club attribute;
    /// `None` returns the full record set.
    ///
    /// # Errors
    ///
    /// Fails on network or query errors.
    async fn list_members(&self, club: Option<&ClubId>) -> Result<Vec<MemberDocument>, BackendError>;
}
