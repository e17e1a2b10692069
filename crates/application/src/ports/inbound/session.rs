//! Session lifecycle port.

use async_trait::async_trait;
use domain::auth::{LoginCredentials, RegisterData};
use domain::session::Session;

use crate::error::Result;

/// Inbound port for the session lifecycle: the operations a view layer may
/// invoke on the session container.
#[async_trait]
pub trait SessionLifecycle: Send + Sync {
    /// Authenticate with email and password.
    ///
    /// On rejection the failure is recorded on the session and rethrown so
    /// callers may chain their own handling.
    async fn login(&self, credentials: LoginCredentials) -> Result<()>;

    /// Create an account; contract shape identical to [`Self::login`].
    async fn register(&self, data: RegisterData) -> Result<()>;

    /// Tear the session down. The server-side logout call is best-effort;
    /// local teardown always completes and this never fails.
    async fn logout(&self);

    /// Replace the current user and token with a freshly issued pair. On
    /// failure the session is torn down and the failure rethrown.
    async fn refresh_token(&self) -> Result<()>;

    /// Drop any recorded error; every other field is untouched.
    fn clear_error(&self);

    /// Current session, flattened for view consumption.
    fn session(&self) -> Session;
}
