//! Member directory store.
//!
//! Keeps the visible member list consistent with the current identity's club
//! scope. The whole list is replaced on every reload; there is no partial
//! merge. Fetch errors never leave this component - consumers read them as
//! [`RosterStatus::Failed`], which keeps a failed fetch distinguishable from
//! a genuinely empty club.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use tokio::sync::watch;

use crate::backend::MemberDocument;
use crate::models::{Identity, MemberRecord};
use crate::services::session::SessionState;
use crate::sources::DocumentSource;

/// Outcome tag of the most recent reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterStatus {
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded and returned members.
    Loaded,
    /// No members: either the club is empty or no identity is present.
    Empty,
    /// The last fetch failed; the list was cleared.
    Failed(String),
}

struct Roster {
    status: RosterStatus,
    members: Vec<MemberRecord>,
}

/// Holds the member list for the current identity.
pub struct DirectoryStore<S> {
    source: S,
    roster: RwLock<Roster>,
    // Reload generation; results from superseded reloads are discarded so a
    // slow early fetch cannot overwrite a later one with stale data.
    generation: AtomicU64,
}

impl<S: DocumentSource> DirectoryStore<S> {
    /// Create an empty store over a document source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            roster: RwLock::new(Roster {
                status: RosterStatus::Empty,
                members: Vec::new(),
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Replace the member list for the given identity.
    ///
    /// With no identity the list is cleared without any fetch. Otherwise one
    /// fetch is issued, scoped by the identity's club when it has one, and
    /// the list is replaced with the normalized result. Errors are logged
    /// and reported as [`RosterStatus::Failed`]; they do not propagate.
    pub async fn reload(&self, identity: Option<&Identity>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(identity) = identity else {
            self.apply(generation, RosterStatus::Empty, Vec::new());
            return;
        };

        self.apply(generation, RosterStatus::Loading, Vec::new());

        let club = identity.club_id();
        match self.source.list_members(club.as_ref()).await {
            Ok(documents) => {
                let members = normalize(documents);
                let status = if members.is_empty() {
                    RosterStatus::Empty
                } else {
                    RosterStatus::Loaded
                };
                self.apply(generation, status, members);
            }
            Err(err) => {
                tracing::error!("failed to load member roster: {err}");
                self.apply(generation, RosterStatus::Failed(err.to_string()), Vec::new());
            }
        }
    }

    /// Drive reloads from session state changes until the sender is dropped.
    ///
    /// Reloads once for the state observed at entry, then once per change.
    pub async fn watch(&self, mut sessions: watch::Receiver<SessionState>) {
        loop {
            let identity = sessions.borrow_and_update().identity().cloned();
            self.reload(identity.as_ref()).await;

            if sessions.changed().await.is_err() {
                break;
            }
        }
    }

    /// Snapshot of the current member list, in fetch order.
    #[must_use]
    pub fn members(&self) -> Vec<MemberRecord> {
        self.read().members.clone()
    }

    /// Outcome tag of the most recent reload.
    #[must_use]
    pub fn status(&self) -> RosterStatus {
        self.read().status.clone()
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status() == RosterStatus::Loading
    }

    /// Members whose first or last name contains `term`, case-insensitively.
    ///
    /// An empty term returns the full list in original order; no matches
    /// returns an empty list (the consumer renders an explicit empty state).
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<MemberRecord> {
        let roster = self.read();
        if term.is_empty() {
            return roster.members.clone();
        }

        let needle = term.to_lowercase();
        roster
            .members
            .iter()
            .filter(|member| member.matches_name(&needle))
            .cloned()
            .collect()
    }

    /// The member with the given id, under string equality.
    ///
    /// Duplicate ids are a data-integrity problem in the source collection;
    /// when they occur anyway, the latest entry in fetch order wins here
    /// (and the reload logged a warning naming the id).
    #[must_use]
    pub fn member_by_id(&self, id: &str) -> Option<MemberRecord> {
        self.read()
            .members
            .iter()
            .rev()
            .find(|member| member.id.as_str() == id)
            .cloned()
    }

    fn apply(&self, generation: u64, status: RosterStatus, members: Vec<MemberRecord>) {
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("discarding roster result from superseded reload");
            return;
        }

        let mut roster = self
            .roster
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        roster.status = status;
        roster.members = members;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Roster> {
        self.roster.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Map raw documents into display-ready records, flagging duplicate ids.
fn normalize(documents: Vec<MemberDocument>) -> Vec<MemberRecord> {
    let members: Vec<MemberRecord> = documents.into_iter().map(MemberRecord::from).collect();

    let mut seen = HashSet::new();
    for member in &members {
        if !seen.insert(member.id.clone()) {
            tracing::warn!(
                id = %member.id,
                "duplicate member id in roster; id lookup resolves to the latest entry"
            );
        }
    }

    members
}
