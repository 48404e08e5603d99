//! OS keychain storage for the gym backend password.
//!
//! One entry per username under the "gymdeck" service. Lookups are
//! best-effort: a locked or absent keychain degrades to "no saved
//! password" rather than an error, so login just starts with an empty
//! field.

use anyhow::{Context, Result};
use keyring::Entry;
use tracing::debug;

const SERVICE_NAME: &str = "gymdeck";

pub struct CredentialStore;

impl CredentialStore {
    fn entry(username: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, username).context("Failed to create keyring entry")
    }

    /// Save the password for a username, replacing any previous entry
    pub fn store(username: &str, password: &str) -> Result<()> {
        Self::entry(username)?
            .set_password(password)
            .context("Failed to store password in keychain")
    }

    /// The saved password for a username, if the keychain has one.
    /// Used to prefill the login form; never fails.
    pub fn saved_password(username: &str) -> Option<String> {
        match Self::entry(username).and_then(|e| {
            e.get_password()
                .context("Failed to read password from keychain")
        }) {
            Ok(password) => Some(password),
            Err(e) => {
                debug!(username, error = %e, "No saved password available");
                None
            }
        }
    }

    /// Drop the saved password for a username.
    /// Called when a stored password stops working.
    pub fn delete(username: &str) -> Result<()> {
        Self::entry(username)?
            .delete_credential()
            .context("Failed to delete credential from keychain")
    }
}
