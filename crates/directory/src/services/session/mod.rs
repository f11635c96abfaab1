//! Identity session manager.
//!
//! Maintains exactly one of {no session, authenticated session} and provides
//! the only legal transitions between them. State changes are published on a
//! watch channel so the directory store (and any other observer) can react
//! to identity changes without polling.
//!
//! # Error policy
//!
//! - `restore` and `logout` never fail from the caller's point of view: an
//!   absent session is the normal cold-start outcome, and logout clears
//!   local state even when the remote deletion fails.
//! - `login` and `signup` propagate their errors verbatim for the
//!   presentation layer to display; local state is left unchanged.

mod error;

pub use error::SessionError;

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Map, Value};
use tokio::sync::watch;

use clubhouse_core::{ClubId, Email};

use crate::models::{Identity, PREF_CLUB_ID};
use crate::sources::AccountService;

/// Where the session machine currently stands.
///
/// `Initializing` covers the window between process start and the first
/// `restore` outcome; afterwards the machine cycles between the other two
/// states for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Initializing,
    Unauthenticated,
    Authenticated(Identity),
}

impl SessionState {
    /// The identity, when one is present.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// Whether the initial restore has completed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        !matches!(self, Self::Initializing)
    }

    /// Whether a session is active.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Owns the authenticated-user value and the session lifecycle.
pub struct SessionManager<A> {
    accounts: A,
    state: watch::Sender<SessionState>,
    busy: AtomicBool,
}

impl<A: AccountService> SessionManager<A> {
    /// Create a manager in the `Initializing` state.
    pub fn new(accounts: A) -> Self {
        let (state, _) = watch::channel(SessionState::Initializing);
        Self {
            accounts,
            state,
            busy: AtomicBool::new(false),
        }
    }

    /// Subscribe to session state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Snapshot of the current identity, when authenticated.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    /// Whether an operation is in flight or the initial restore has not
    /// finished yet.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.busy.load(Ordering::Acquire) || !self.state.borrow().is_ready()
    }

    /// Attempt to restore an existing session. Invoked once at process
    /// start, and again whenever the caller wants to re-validate.
    ///
    /// Any failure (network, no active session, invalid token) resolves to
    /// `Unauthenticated` - an expected outcome, not an error. A failure
    /// while `Authenticated` is treated as session loss.
    pub async fn restore(&self) {
        let _busy = self.mark_busy();

        match self.accounts.current_account().await {
            Ok(account) => {
                self.state
                    .send_replace(SessionState::Authenticated(account.into()));
            }
            Err(err) => {
                tracing::debug!("session restore found no active session: {err}");
                self.state.send_replace(SessionState::Unauthenticated);
            }
        }
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Propagates invalid credentials and network errors; the session state
    /// is left unchanged on failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(SessionError::MissingField("password"));
        }

        let _busy = self.mark_busy();

        self.accounts
            .create_email_session(email.as_str(), password)
            .await?;
        let account = self.accounts.current_account().await?;

        let identity = Identity::from(account);
        self.state
            .send_replace(SessionState::Authenticated(identity.clone()));
        Ok(identity)
    }

    /// Create an account, open a session, and record the club scope.
    ///
    /// The sequence is a saga: once a session exists, any later failure
    /// rolls the session back before propagating, so no half-authenticated
    /// state survives. The account service offers no account deletion, so a
    /// created account can remain when session creation itself fails; the
    /// propagated error tells the caller signup did not complete.
    ///
    /// # Errors
    ///
    /// Propagates duplicate email, weak password (policy is owned by the
    /// account service), and network errors.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        club: &ClubId,
    ) -> Result<Identity, SessionError> {
        if name.trim().is_empty() {
            return Err(SessionError::MissingField("name"));
        }
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(SessionError::MissingField("password"));
        }
        if club.as_str().is_empty() {
            return Err(SessionError::MissingField("club id"));
        }

        let _busy = self.mark_busy();

        self.accounts
            .create_account(name, email.as_str(), password)
            .await?;
        self.accounts
            .create_email_session(email.as_str(), password)
            .await?;

        let mut prefs = Map::new();
        prefs.insert(PREF_CLUB_ID.to_owned(), Value::from(club.as_str()));

        if let Err(err) = self.accounts.update_preferences(&prefs).await {
            self.roll_back_session().await;
            return Err(err.into());
        }

        let account = match self.accounts.current_account().await {
            Ok(account) => account,
            Err(err) => {
                self.roll_back_session().await;
                return Err(err.into());
            }
        };

        let identity = Identity::from(account);
        self.state
            .send_replace(SessionState::Authenticated(identity.clone()));
        Ok(identity)
    }

    /// Log out. The remote session is deleted best-effort; local state is
    /// cleared unconditionally once logout was requested.
    pub async fn logout(&self) {
        let _busy = self.mark_busy();

        if let Err(err) = self.accounts.delete_current_session().await {
            tracing::warn!("remote session deletion failed; clearing local session anyway: {err}");
        }

        self.state.send_replace(SessionState::Unauthenticated);
    }

    async fn roll_back_session(&self) {
        if let Err(err) = self.accounts.delete_current_session().await {
            tracing::warn!("could not roll back session after aborted signup: {err}");
        }
    }

    fn mark_busy(&self) -> BusyGuard<'_> {
        self.busy.store(true, Ordering::Release);
        BusyGuard(&self.busy)
    }
}

/// Clears the busy flag on every exit path of an operation.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::backend::{Account, BackendError};

    fn account_with_prefs(prefs: Value) -> Account {
        serde_json::from_value(json!({
            "$id": "u1",
            "name": "Ann Lee",
            "email": "ann@example.com",
            "prefs": prefs,
        }))
        .unwrap()
    }

    fn service_error(kind: &str, status: u16) -> BackendError {
        BackendError::Api {
            status,
            kind: kind.to_owned(),
            message: String::new(),
        }
    }

    /// Scripted account service double.
    #[derive(Default)]
    struct FakeAccounts {
        has_session: Mutex<bool>,
        fail_create_session: bool,
        fail_update_prefs: bool,
        fail_delete_session: bool,
        written_prefs: Mutex<Option<Map<String, Value>>>,
        calls: AtomicUsize,
        deletions: AtomicUsize,
    }

    impl FakeAccounts {
        fn with_session() -> Self {
            let fake = Self::default();
            *fake.has_session.lock().unwrap() = true;
            fake
        }
    }

    #[async_trait]
    impl AccountService for FakeAccounts {
        async fn current_account(&self) -> Result<Account, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !*self.has_session.lock().unwrap() {
                return Err(service_error("general_unauthorized_scope", 401));
            }
            let prefs = self
                .written_prefs
                .lock()
                .unwrap()
                .clone()
                .map_or(json!({}), Value::Object);
            Ok(account_with_prefs(prefs))
        }

        async fn create_account(
            &self,
            _name: &str,
            _email: &str,
            _password: &str,
        ) -> Result<(), BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn create_email_session(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<(), BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_create_session {
                return Err(service_error("user_invalid_credentials", 401));
            }
            *self.has_session.lock().unwrap() = true;
            Ok(())
        }

        async fn update_preferences(
            &self,
            prefs: &Map<String, Value>,
        ) -> Result<(), BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_update_prefs {
                return Err(service_error("general_server_error", 500));
            }
            *self.written_prefs.lock().unwrap() = Some(prefs.clone());
            Ok(())
        }

        async fn delete_current_session(&self) -> Result<(), BackendError> {
            self.deletions.fetch_add(1, Ordering::SeqCst);
            *self.has_session.lock().unwrap() = false;
            if self.fail_delete_session {
                return Err(service_error("general_server_error", 500));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_restore_success_authenticates() {
        let sessions = SessionManager::new(FakeAccounts::with_session());
        assert!(!sessions.state().is_ready());

        sessions.restore().await;

        assert!(sessions.state().is_authenticated());
        assert!(!sessions.is_loading());
        assert_eq!(sessions.identity().unwrap().display_name, "Ann Lee");
    }

    #[tokio::test]
    async fn test_restore_failure_is_silent_and_ready() {
        let sessions = SessionManager::new(FakeAccounts::default());

        sessions.restore().await;

        assert_eq!(sessions.state(), SessionState::Unauthenticated);
        assert!(!sessions.is_loading());
    }

    #[tokio::test]
    async fn test_login_validates_inputs_before_any_remote_call() {
        let sessions = SessionManager::new(FakeAccounts::default());

        assert!(matches!(
            sessions.login("not-an-email", "pw").await,
            Err(SessionError::InvalidEmail(_))
        ));
        assert!(matches!(
            sessions.login("ann@example.com", "").await,
            Err(SessionError::MissingField("password"))
        ));
        assert_eq!(sessions.accounts.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_leaves_identity_absent() {
        let fake = FakeAccounts {
            fail_create_session: true,
            ..FakeAccounts::default()
        };
        let sessions = SessionManager::new(fake);

        let err = sessions.login("ann@example.com", "wrong").await.unwrap_err();

        assert!(matches!(err, SessionError::InvalidCredentials));
        assert!(sessions.identity().is_none());
    }

    #[tokio::test]
    async fn test_signup_records_club_preference() {
        let sessions = SessionManager::new(FakeAccounts::default());

        let identity = sessions
            .signup("Ann Lee", "ann@example.com", "hunter2!", &ClubId::new("sigma-rho"))
            .await
            .unwrap();

        assert_eq!(identity.club_id(), Some(ClubId::new("sigma-rho")));
        assert!(sessions.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_signup_rolls_back_session_when_pref_write_fails() {
        let fake = FakeAccounts {
            fail_update_prefs: true,
            ..FakeAccounts::default()
        };
        let sessions = SessionManager::new(fake);

        let err = sessions
            .signup("Ann Lee", "ann@example.com", "hunter2!", &ClubId::new("sigma-rho"))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Service(_)));
        assert_eq!(sessions.accounts.deletions.load(Ordering::SeqCst), 1);
        assert!(sessions.identity().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_identity_despite_remote_failure() {
        let fake = FakeAccounts {
            fail_delete_session: true,
            ..FakeAccounts::with_session()
        };
        let sessions = SessionManager::new(fake);
        sessions.restore().await;
        assert!(sessions.state().is_authenticated());

        sessions.logout().await;

        assert_eq!(sessions.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let sessions = SessionManager::new(FakeAccounts::with_session());
        let mut updates = sessions.subscribe();
        assert_eq!(*updates.borrow_and_update(), SessionState::Initializing);

        sessions.restore().await;
        updates.changed().await.unwrap();
        assert!(updates.borrow_and_update().is_authenticated());

        sessions.logout().await;
        updates.changed().await.unwrap();
        assert_eq!(*updates.borrow_and_update(), SessionState::Unauthenticated);
    }
}
