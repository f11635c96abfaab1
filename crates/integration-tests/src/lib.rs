//! Shared fixtures for the Clubhouse integration tests.
//!
//! The tests run the real client stack against an in-process mock of the
//! hosted service; these helpers build the client and fabricate wire
//! payloads in the shapes the service uses.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use httpmock::MockServer;
use serde_json::{Value, json};
use url::Url;

use clubhouse_core::UserId;
use clubhouse_directory::backend::Backend;
use clubhouse_directory::config::DirectoryConfig;
use clubhouse_directory::models::{Identity, PREF_CLUB_ID};

/// Document listing path for the default database and collection ids.
pub const DOCUMENTS_PATH: &str = "/v1/databases/directory/collections/members/documents";

/// Build a backend client pointed at the mock server.
#[must_use]
pub fn backend_for(server: &MockServer) -> Backend {
    let endpoint =
        Url::parse(&format!("{}/v1", server.base_url())).expect("mock server URL should parse");
    Backend::new(&DirectoryConfig::new(endpoint, "test-project"))
}

/// Account payload as the service reports it.
#[must_use]
pub fn account_body(name: &str, email: &str, club: Option<&str>) -> Value {
    let prefs = match club {
        Some(club) => json!({ "clubId": club }),
        None => json!({}),
    };
    json!({
        "$id": "u-1000",
        "$createdAt": "2026-05-04T16:20:00.000+00:00",
        "name": name,
        "email": email,
        "prefs": prefs,
    })
}

/// Session payload carrying the secret the client must replay.
#[must_use]
pub fn session_body(secret: &str) -> Value {
    json!({
        "$id": "sess-1",
        "userId": "u-1000",
        "secret": secret,
    })
}

/// A raw member document.
#[must_use]
pub fn member_doc(id: &str, first: &str, last: &str, club: &str) -> Value {
    json!({
        "$id": id,
        "firstName": first,
        "lastName": last,
        "club": club,
    })
}

/// One page of documents.
#[must_use]
pub fn document_list(documents: &[Value]) -> Value {
    json!({ "total": documents.len(), "documents": documents })
}

/// A ready-made identity for driving the store without a session manager.
#[must_use]
pub fn identity_with_club(club: Option<&str>) -> Identity {
    let mut preferences = serde_json::Map::new();
    if let Some(club) = club {
        preferences.insert(PREF_CLUB_ID.to_owned(), Value::from(club));
    }

    Identity {
        id: UserId::new("u-1000"),
        display_name: "Ann Lee".to_owned(),
        email: "ann@example.com".to_owned(),
        created_at: None,
        preferences,
    }
}
