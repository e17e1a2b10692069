//! Interface for observability operations.

/// Port for recording session lifecycle events.
pub trait TelemetryPort: Send + Sync {
    /// A login, registration or refresh call succeeded.
    fn record_auth_success(&self, user_id: &str, method: &str);

    /// A login, registration or refresh call was rejected.
    fn record_auth_failure(&self, reason: &str);

    /// The session was torn down; `forced` distinguishes invalidation from
    /// an explicit logout.
    fn record_logout(&self, forced: bool);

    /// A persisted session was restored at startup.
    fn record_session_rehydrated(&self, user_id: &str);
}
