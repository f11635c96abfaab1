//! Document listing against the hosted service.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use clubhouse_core::ClubId;

use super::{Backend, BackendError};
use crate::sources::DocumentSource;

/// Attribute on member documents that carries the club scope.
pub const CLUB_ATTRIBUTE: &str = "club";

/// A raw member document as stored in the members collection.
///
/// Everything beyond the name fields is optional in the collection schema;
/// normalization into a display-ready record happens in
/// [`crate::models::MemberRecord`].
#[derive(Debug, Clone, Deserialize)]
pub struct MemberDocument {
    /// Service-assigned document id.
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(rename = "relationshipStatus", default)]
    pub relationship_status: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Office held, when any. An empty string means no office.
    #[serde(default)]
    pub officer: Option<String>,
    #[serde(rename = "showEmail", default)]
    pub show_email: Option<bool>,
    #[serde(rename = "showPhone", default)]
    pub show_phone: Option<bool>,
    /// Club scope tag; matched against the identity's `clubId` preference.
    #[serde(default)]
    pub club: Option<String>,
}

/// One page of documents. The service pages past 25 by default, but club
/// rosters fit in a single page; total is reported for diagnostics only.
#[derive(Debug, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub total: u64,
    pub documents: Vec<MemberDocument>,
}

/// A single equality predicate, encoded the way the service's query parser
/// expects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Build an `equal` predicate on one attribute.
    #[must_use]
    pub fn equal(attribute: &str, value: &str) -> Self {
        Self(
            serde_json::json!({
                "method": "equal",
                "attribute": attribute,
                "values": [value],
            })
            .to_string(),
        )
    }

    /// The encoded predicate, ready to be passed as a `queries[]` parameter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl DocumentSource for Backend {
    async fn list_members(&self, club: Option<&ClubId>) -> Result<Vec<MemberDocument>, BackendError> {
        let config = self.config();
        let path = format!(
            "databases/{}/collections/{}/documents",
            config.database_id, config.members_collection_id
        );

        let mut request = self.request(Method::GET, &path);
        if let Some(club) = club {
            request = request.query(&[(
                "queries[]",
                Query::equal(CLUB_ATTRIBUTE, club.as_str()).as_str(),
            )]);
        }

        let list: DocumentList = Self::decode(request.send().await?).await?;
        Ok(list.documents)
    }
}
