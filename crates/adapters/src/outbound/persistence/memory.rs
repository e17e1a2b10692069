//! In-memory credential store.

use std::sync::Mutex;

use application::error::Result;
use application::ports::outbound::{CredentialStore, PersistedCredentials};

/// [`CredentialStore`] that never touches disk. Nothing survives the
/// process; useful for tests and headless wiring.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<PersistedCredentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<PersistedCredentials>> {
        Ok(self.slot.lock().expect("store lock poisoned").clone())
    }

    fn save(&self, credentials: &PersistedCredentials) -> Result<()> {
        *self.slot.lock().expect("store lock poisoned") =
            Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().expect("store lock poisoned") = None;
        Ok(())
    }
}
