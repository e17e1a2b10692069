//! Telemetry adapters - Observability implementations.

use application::ports::outbound::TelemetryPort;

/// Tracing-based telemetry adapter.
#[derive(Default)]
pub struct TracingTelemetry;

impl TracingTelemetry {
    /// Create a new [`TracingTelemetry`].
    pub fn new() -> Self {
        Self
    }
}

impl TelemetryPort for TracingTelemetry {
    fn record_auth_success(&self, user_id: &str, method: &str) {
        tracing::info!(
            user_id = user_id,
            method = method,
            "authentication successful"
        );
    }

    fn record_auth_failure(&self, reason: &str) {
        tracing::info!(reason = reason, "authentication failed");
    }

    fn record_logout(&self, forced: bool) {
        tracing::info!(forced = forced, "session terminated");
    }

    fn record_session_rehydrated(&self, user_id: &str) {
        tracing::info!(user_id = user_id, "session restored from storage");
    }
}
