//! CLI subcommands.

pub mod account;
pub mod members;

use clubhouse_directory::backend::Backend;
use clubhouse_directory::config::{ConfigError, DirectoryConfig};
use clubhouse_directory::services::session::SessionManager;

/// Build the backend client and session manager from the environment.
///
/// The backend is cloned into the session manager so a directory store built
/// on the same clone shares the session.
pub(crate) fn connect() -> Result<(Backend, SessionManager<Backend>), ConfigError> {
    let config = DirectoryConfig::from_env()?;
    let backend = Backend::new(&config);
    Ok((backend.clone(), SessionManager::new(backend)))
}

/// Prompt for a password without echoing it.
pub(crate) fn prompt_password(prompt: &str) -> dialoguer::Result<String> {
    dialoguer::Password::new().with_prompt(prompt).interact()
}
