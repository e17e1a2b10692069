//! Backend API port.

use async_trait::async_trait;
use domain::auth::{LoginCredentials, RegisterData};
use domain::identity::User;

use crate::dto::AuthResponse;
use crate::error::Result;

/// Port for the authentication surface of the backend.
///
/// The implementation holds a single in-memory bearer token and decorates
/// every outgoing request with it; the durable copy of that token is owned
/// by the session container, which installs it through [`AuthApi::set_token`].
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials)
    -> Result<AuthResponse>;

    async fn register(&self, data: &RegisterData) -> Result<AuthResponse>;

    /// Exchange the current token for a fresh user/token pair.
    async fn refresh(&self) -> Result<AuthResponse>;

    /// Server-side session teardown notification.
    async fn logout(&self) -> Result<()>;

    /// Fetch the current user record; used to probe token liveness.
    async fn fetch_profile(&self) -> Result<User>;

    /// Install the bearer token for all subsequent requests.
    fn set_token(&self, token: &str);

    /// Drop the in-memory bearer token; subsequent requests go out
    /// unauthenticated.
    fn clear_token(&self);
}

/// Hook fired by the transport whenever it observes a 401 response.
///
/// The policy is deliberately blunt: any 401 anywhere tears the whole
/// session down, without distinguishing a stale in-flight request from a
/// genuinely revoked token.
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self);
}
