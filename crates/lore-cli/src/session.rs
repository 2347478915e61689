//! CLI session persistence with secure keychain storage.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use lore_core::auth::{AuthSession, CredentialStore};
use lore_core::{Error, Result};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "lore-cli";

/// Keychain-backed credential store (in-memory map under `cfg(test)`)
#[derive(Clone)]
pub struct SessionStore {
    username: String,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            username: "story_session".to_string(),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| Error::Persistence(format!("keychain: {error}")))
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for SessionStore {
    #[cfg(not(test))]
    fn load_session(&self) -> Result<Option<AuthSession>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::Persistence(format!("keychain: {error}"))),
        }
    }

    #[cfg(test)]
    fn load_session(&self) -> Result<Option<AuthSession>> {
        let store = Self::test_store();
        let guard = store
            .lock()
            .map_err(|error| Error::Persistence(error.to_string()))?;
        if let Some(raw) = guard.get(&self.username) {
            Ok(Some(serde_json::from_str(raw)?))
        } else {
            Ok(None)
        }
    }

    #[cfg(not(test))]
    fn save_session(&self, session: &AuthSession) -> Result<()> {
        let raw = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| Error::Persistence(format!("keychain: {error}")))?;
        Ok(())
    }

    #[cfg(test)]
    fn save_session(&self, session: &AuthSession) -> Result<()> {
        let raw = serde_json::to_string(session)?;
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| Error::Persistence(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_session(&self) -> Result<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::Persistence(format!("keychain: {error}"))),
        }
    }

    #[cfg(test)]
    fn clear_session(&self) -> Result<()> {
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| Error::Persistence(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}
