//! The authenticated identity.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use clubhouse_core::{ClubId, UserId};

use crate::backend::Account;

/// Preference key carrying the club scope, written at signup.
pub const PREF_CLUB_ID: &str = "clubId";

/// The locally held representation of the currently authenticated user.
///
/// Exclusively owned by the session manager; every other component receives
/// clones and treats them as read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Account id at the external service.
    pub id: UserId,
    /// Display name chosen at signup.
    pub display_name: String,
    /// Email the account was registered with.
    pub email: String,
    /// When the account was created.
    pub created_at: Option<DateTime<Utc>>,
    /// Open preference mapping.
    pub preferences: Map<String, Value>,
}

impl Identity {
    /// The club this identity may view, when one was recorded at signup.
    ///
    /// An absent or empty value means the identity is unscoped and sees the
    /// full member set.
    #[must_use]
    pub fn club_id(&self) -> Option<ClubId> {
        self.preferences
            .get(PREF_CLUB_ID)?
            .as_str()
            .filter(|club| !club.is_empty())
            .map(ClubId::new)
    }
}

impl From<Account> for Identity {
    fn from(account: Account) -> Self {
        Self {
            id: UserId::new(account.id),
            display_name: account.name,
            email: account.email,
            created_at: account.created_at,
            preferences: account.prefs,
        }
    }
}
