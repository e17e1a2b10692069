//! Data Transfer Objects for the application layer.

use domain::identity::User;
use serde::{Deserialize, Serialize};

/// Response shape shared by the login, register and refresh endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user record.
    pub user: User,
    /// Opaque bearer token to present on subsequent requests.
    pub access_token: String,
    /// Token scheme (e.g., "bearer").
    pub token_type: String,
    /// Expiration time in seconds.
    pub expires_in: u64,
}
