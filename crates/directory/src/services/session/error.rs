//! Session error types.

use thiserror::Error;

use clubhouse_core::EmailError;

use crate::backend::BackendError;

/// Errors surfaced by session operations.
///
/// Login and signup failures propagate to the caller for display; restore
/// and logout failures never do (see the session manager docs).
#[derive(Debug, Error)]
pub enum SessionError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// A required input was empty.
    #[error("{0} cannot be empty")]
    MissingField(&'static str),

    /// Wrong email/password combination.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// The account service rejected the password (policy is service-owned).
    #[error("password rejected: {0}")]
    WeakPassword(String),

    /// Any other account service failure.
    #[error("account service error: {0}")]
    Service(#[source] BackendError),
}

impl From<BackendError> for SessionError {
    fn from(err: BackendError) -> Self {
        if err.is_invalid_credentials() {
            return Self::InvalidCredentials;
        }
        if err.is_duplicate_email() {
            return Self::EmailTaken;
        }
        if err.is_weak_password() {
            return Self::WeakPassword(err.to_string());
        }
        Self::Service(err)
    }
}
