//! Directory configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CLUBHOUSE_ENDPOINT` - Base URL of the hosted backend, including the
//!   API version segment (e.g., `https://cloud.example.io/v1`)
//! - `CLUBHOUSE_PROJECT_ID` - Backend project identifier
//!
//! ## Optional
//! - `CLUBHOUSE_DATABASE_ID` - Document database id (default: `directory`)
//! - `CLUBHOUSE_MEMBERS_COLLECTION_ID` - Members collection id (default: `members`)

use thiserror::Error;
use url::Url;

/// Default document database id.
const DEFAULT_DATABASE_ID: &str = "directory";

/// Default members collection id.
const DEFAULT_MEMBERS_COLLECTION_ID: &str = "members";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Directory application configuration.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Base URL of the hosted backend (including the API version segment)
    pub endpoint: Url,
    /// Backend project identifier, sent with every request
    pub project_id: String,
    /// Document database id
    pub database_id: String,
    /// Members collection id
    pub members_collection_id: String,
}

impl DirectoryConfig {
    /// Create a configuration with default database and collection ids.
    #[must_use]
    pub fn new(endpoint: Url, project_id: impl Into<String>) -> Self {
        Self {
            endpoint,
            project_id: project_id.into(),
            database_id: DEFAULT_DATABASE_ID.to_owned(),
            members_collection_id: DEFAULT_MEMBERS_COLLECTION_ID.to_owned(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let endpoint = get_required_env("CLUBHOUSE_ENDPOINT")?;
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            ConfigError::InvalidEnvVar("CLUBHOUSE_ENDPOINT".to_string(), e.to_string())
        })?;

        Ok(Self {
            endpoint,
            project_id: get_required_env("CLUBHOUSE_PROJECT_ID")?,
            database_id: get_env_or_default("CLUBHOUSE_DATABASE_ID", DEFAULT_DATABASE_ID),
            members_collection_id: get_env_or_default(
                "CLUBHOUSE_MEMBERS_COLLECTION_ID",
                DEFAULT_MEMBERS_COLLECTION_ID,
            ),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
