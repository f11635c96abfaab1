//! Bundled roster dataset.
//!
//! The app predates its hosted backend; early builds shipped the roster as
//! static data. This source preserves that variant: a JSON document embedded
//! at compile time, served through the same [`DocumentSource`] contract with
//! the club filter applied in memory.

use async_trait::async_trait;

use clubhouse_core::ClubId;

use super::DocumentSource;
use crate::backend::{BackendError, MemberDocument};

/// Demo roster shipped with the binary.
const BUNDLED_ROSTER_JSON: &str = include_str!("../../data/roster.json");

/// An in-memory document source backed by embedded JSON.
#[derive(Debug, Clone)]
pub struct BundledRoster {
    documents: Vec<MemberDocument>,
}

impl BundledRoster {
    /// Load the roster shipped with the binary.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the embedded JSON is malformed.
    pub fn load() -> Result<Self, serde_json::Error> {
        Self::from_json(BUNDLED_ROSTER_JSON)
    }

    /// Parse a roster from a JSON array of raw member documents.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the JSON does not match the document shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            documents: serde_json::from_str(json)?,
        })
    }
}

#[async_trait]
impl DocumentSource for BundledRoster {
    async fn list_members(&self, club: Option<&ClubId>) -> Result<Vec<MemberDocument>, BackendError> {
        Ok(self
            .documents
            .iter()
            .filter(|doc| match club {
                Some(club) => doc.club.as_deref() == Some(club.as_str()),
                None => true,
            })
            .cloned()
            .collect())
    }
}
