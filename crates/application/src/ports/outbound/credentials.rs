//! Credential store port.

use domain::identity::User;

use crate::error::Result;

/// The durable projection of an authenticated session.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedCredentials {
    pub token: String,
    pub user: User,
}

/// Port for the two-key durable credential store.
///
/// Owned exclusively by the session container; the transport never reads
/// it. The store holds a bearer token and a serialized user record which
/// are only meaningful together: a half-present pair loads as absent.
pub trait CredentialStore: Send + Sync {
    /// Load the persisted pair. `Ok(None)` when either key is absent;
    /// `Err` when the stored data exists but cannot be read back.
    fn load(&self) -> Result<Option<PersistedCredentials>>;

    /// Write both keys, replacing any previous pair.
    fn save(&self, credentials: &PersistedCredentials) -> Result<()>;

    /// Delete both keys.
    fn clear(&self) -> Result<()>;
}
