//! Session container use case implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::auth::{LoginCredentials, RegisterData};
use domain::identity::User;
use domain::session::{Session, SessionEvent, SessionState};

use crate::dto::AuthResponse;
use crate::error::Result;
use crate::ports::inbound::SessionLifecycle;
use crate::ports::outbound::{
    AuthApi, CredentialStore, Navigator, PersistedCredentials, TelemetryPort,
    UnauthorizedHandler,
};

const LOGIN_FALLBACK: &str = "Login failed";
const REGISTER_FALLBACK: &str = "Registration failed";

/// Single source of truth for authentication status, mediating between the
/// view layer, the durable credential store and the backend.
///
/// Operations are single-flight from the caller's perspective: nothing here
/// de-duplicates concurrent identical calls, and overlapping calls resolve
/// last-writer-wins in completion order. Callers are expected to disable
/// the triggering control while the session is loading.
pub struct SessionService {
    state: RwLock<SessionState>,
    api: Arc<dyn AuthApi>,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    telemetry: Arc<dyn TelemetryPort>,
}

impl SessionService {
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        telemetry: Arc<dyn TelemetryPort>,
    ) -> Self {
        Self {
            state: RwLock::new(SessionState::Anonymous),
            api,
            store,
            navigator,
            telemetry,
        }
    }

    /// Rehydrate the session from the durable store.
    ///
    /// Runs once per process, before the container is considered ready.
    /// A persisted pair hydrates the session optimistically, then a profile
    /// call probes token liveness; a rejected token tears the session back
    /// down. A half-present or unreadable pair is discarded.
    pub async fn initialize(&self) {
        let persisted = match self.store.load() {
            Ok(Some(persisted)) => persisted,
            Ok(None) => return,
            Err(error) => {
                tracing::warn!(
                    error = ?error,
                    "credential store unreadable, discarding stored session"
                );
                if let Err(error) = self.store.clear() {
                    tracing::warn!(error = ?error, "credential store clear failed");
                }
                return;
            },
        };

        self.api.set_token(&persisted.token);
        self.telemetry.record_session_rehydrated(&persisted.user.id);
        self.transition(SessionEvent::Succeeded {
            user: persisted.user,
            token: persisted.token,
        });

        if let Err(error) = self.api.fetch_profile().await {
            tracing::warn!(
                error = ?error,
                "stored token rejected by profile verification"
            );
            self.teardown(true);
        }
    }

    pub(crate) fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Applies `event` atomically; the lock is never held across an await.
    pub(crate) fn transition(&self, event: SessionEvent) {
        let mut state = self.state.write().expect("session lock poisoned");
        *state = std::mem::take(&mut *state).apply(event);
    }

    /// Installs the token, writes the durable projection and publishes the
    /// authenticated state.
    pub(crate) fn complete_authentication(
        &self,
        user: User,
        token: String,
        method: &str,
    ) {
        self.api.set_token(&token);
        if let Err(error) = self.store.save(&PersistedCredentials {
            token: token.clone(),
            user: user.clone(),
        }) {
            // The in-memory session stays authoritative.
            tracing::error!(error = ?error, "failed to persist credentials");
        }

        self.telemetry.record_auth_success(&user.id, method);
        self.transition(SessionEvent::Succeeded { user, token });
    }

    /// Local session teardown shared by logout, failed refresh and failed
    /// rehydration.
    fn teardown(&self, forced: bool) {
        self.api.clear_token();
        if let Err(error) = self.store.clear() {
            tracing::warn!(error = ?error, "credential store clear failed");
        }
        self.telemetry.record_logout(forced);
        self.transition(SessionEvent::LoggedOut);
    }

    async fn authenticate<F>(&self, call: F, fallback: &str) -> Result<()>
    where
        F: std::future::Future<Output = Result<AuthResponse>>,
    {
        self.transition(SessionEvent::Started);

        match call.await {
            Ok(AuthResponse {
                user, access_token, ..
            }) => {
                self.complete_authentication(user, access_token, "password");
                Ok(())
            },
            Err(error) => {
                let message = error.user_message(fallback);
                self.telemetry.record_auth_failure(&message);
                self.transition(SessionEvent::Rejected { message });
                Err(error)
            },
        }
    }
}

#[async_trait]
impl SessionLifecycle for SessionService {
    async fn login(&self, credentials: LoginCredentials) -> Result<()> {
        self.authenticate(self.api.login(&credentials), LOGIN_FALLBACK)
            .await
    }

    async fn register(&self, data: RegisterData) -> Result<()> {
        self.authenticate(self.api.register(&data), REGISTER_FALLBACK)
            .await
    }

    async fn logout(&self) {
        let authenticated =
            self.state.read().expect("session lock poisoned").is_authenticated();

        // Best-effort server notification; local teardown proceeds
        // regardless of its outcome.
        if authenticated {
            if let Err(error) = self.api.logout().await {
                tracing::warn!(error = ?error, "server-side logout failed");
            }
        }

        self.teardown(false);
    }

    async fn refresh_token(&self) -> Result<()> {
        self.transition(SessionEvent::Started);

        match self.api.refresh().await {
            Ok(AuthResponse {
                user, access_token, ..
            }) => {
                self.complete_authentication(user, access_token, "refresh");
                Ok(())
            },
            Err(error) => {
                self.teardown(true);
                Err(error)
            },
        }
    }

    fn clear_error(&self) {
        self.transition(SessionEvent::ErrorCleared);
    }

    fn session(&self) -> Session {
        self.state.read().expect("session lock poisoned").snapshot()
    }
}

/// Global 401 policy handed to the transport: empty the durable store and
/// point the active view at the login screen. The in-memory token was
/// already dropped by the transport itself.
///
/// Deliberately blunt: a 401 from a stale in-flight request invalidates a
/// session that may have been legitimately refreshed meanwhile.
pub struct UnauthorizedTeardown {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    telemetry: Arc<dyn TelemetryPort>,
}

impl UnauthorizedTeardown {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        telemetry: Arc<dyn TelemetryPort>,
    ) -> Self {
        Self {
            store,
            navigator,
            telemetry,
        }
    }
}

impl UnauthorizedHandler for UnauthorizedTeardown {
    fn on_unauthorized(&self) {
        if let Err(error) = self.store.clear() {
            tracing::warn!(error = ?error, "credential store clear failed");
        }
        self.telemetry.record_logout(true);
        self.navigator.to_login(None);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use domain::auth::LoginCredentials;

    use super::*;
    use crate::error::ApplicationError;
    use crate::usecases::support::{
        auth_response, test_user, Harness,
    };

    fn credentials() -> LoginCredentials {
        LoginCredentials::new("a@b.com", "x").unwrap()
    }

    fn register_data() -> RegisterData {
        RegisterData::new("a@b.com", "ab", "x", None).unwrap()
    }

    fn api_error(status: u16, detail: Option<&str>) -> ApplicationError {
        ApplicationError::Api {
            status,
            detail: detail.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn test_login_success_populates_session_and_store() {
        let harness = Harness::new();
        harness.api.respond_login(Ok(auth_response("1", "tok123")));

        harness.service.login(credentials()).await.unwrap();

        let session = harness.service.session();
        assert!(session.is_authenticated);
        assert_eq!(session.token.as_deref(), Some("tok123"));
        assert_eq!(session.user.as_ref().unwrap().id, "1");
        assert!(session.error.is_none());

        // Durable projection and in-memory token match exactly.
        let persisted = harness.store.slot().unwrap();
        assert_eq!(persisted.token, "tok123");
        assert_eq!(persisted.user.id, "1");
        assert_eq!(harness.api.token(), Some("tok123".into()));
    }

    #[tokio::test]
    async fn test_login_failure_records_detail_and_rethrows() {
        let harness = Harness::new();
        harness
            .api
            .respond_login(Err(api_error(400, Some("bad credentials"))));

        let error =
            harness.service.login(credentials()).await.unwrap_err();
        assert!(error.has_status(400));

        let session = harness.service.session();
        assert!(!session.is_authenticated);
        assert!(!session.is_loading);
        assert_eq!(session.error.as_deref(), Some("bad credentials"));
    }

    #[tokio::test]
    async fn test_login_failure_without_detail_uses_fallback() {
        let harness = Harness::new();
        harness.api.respond_login(Err(api_error(500, None)));

        let _ = harness.service.login(credentials()).await;
        assert_eq!(
            harness.service.session().error.as_deref(),
            Some("Login failed")
        );
    }

    #[tokio::test]
    async fn test_register_failure_surfaces_backend_detail() {
        let harness = Harness::new();
        harness
            .api
            .respond_register(Err(api_error(409, Some("email already exists"))));

        let _ = harness.service.register(register_data()).await;

        let session = harness.service.session();
        assert_eq!(session.error.as_deref(), Some("email already exists"));
        assert!(!session.is_authenticated);
    }

    #[tokio::test]
    async fn test_logout_clears_store_even_when_server_call_fails() {
        let harness = Harness::authenticated("1", "tok123").await;
        harness
            .api
            .respond_logout(Err(api_error(503, None)));

        harness.service.logout().await;

        assert_eq!(harness.api.logout_calls.load(Ordering::SeqCst), 1);
        assert!(harness.store.slot().is_none());
        assert!(harness.api.token().is_none());
        assert_eq!(harness.service.session(), SessionState::Anonymous.snapshot());
    }

    #[tokio::test]
    async fn test_logout_skips_server_call_when_anonymous() {
        let harness = Harness::new();

        harness.service.logout().await;

        assert_eq!(harness.api.logout_calls.load(Ordering::SeqCst), 0);
        assert!(!harness.service.session().is_authenticated);
    }

    #[tokio::test]
    async fn test_refresh_success_replaces_identity_and_repersists() {
        let harness = Harness::authenticated("1", "tok123").await;
        harness.api.respond_refresh(Ok(auth_response("1", "tok456")));

        harness.service.refresh_token().await.unwrap();

        let session = harness.service.session();
        assert_eq!(session.token.as_deref(), Some("tok456"));
        assert_eq!(harness.store.slot().unwrap().token, "tok456");
        assert_eq!(harness.api.token(), Some("tok456".into()));
    }

    #[tokio::test]
    async fn test_refresh_failure_forces_teardown_and_rethrows() {
        let harness = Harness::authenticated("1", "tok123").await;
        harness.api.respond_refresh(Err(api_error(401, None)));

        let error = harness.service.refresh_token().await.unwrap_err();
        assert!(error.has_status(401));

        assert!(harness.store.slot().is_none());
        assert!(!harness.service.session().is_authenticated);
        assert!(harness.service.session().error.is_none());
    }

    #[tokio::test]
    async fn test_initialize_rehydrates_persisted_session() {
        let harness = Harness::new();
        harness.store.preload("tok123", test_user("1"));
        harness.api.respond_profile(Ok(test_user("1")));

        harness.service.initialize().await;

        let session = harness.service.session();
        assert!(session.is_authenticated);
        assert_eq!(session.token.as_deref(), Some("tok123"));
        assert_eq!(session.user.as_ref().unwrap().id, "1");
        assert_eq!(harness.api.token(), Some("tok123".into()));
    }

    #[tokio::test]
    async fn test_rehydration_is_optimistic_before_verification_resolves() {
        let harness = Harness::new();
        harness.store.preload("tok123", test_user("1"));
        harness.api.profile_never_resolves();

        let initialize = harness.service.initialize();
        tokio::pin!(initialize);
        tokio::select! {
            biased;
            _ = &mut initialize => panic!("verification should still be in flight"),
            _ = tokio::time::sleep(std::time::Duration::from_millis(10)) => {},
        }

        // The common still-valid-session case sees no loading flash.
        let session = harness.service.session();
        assert!(session.is_authenticated);
        assert!(!session.is_loading);
        assert_eq!(session.user.as_ref().unwrap().id, "1");
    }

    #[tokio::test]
    async fn test_initialize_tears_down_on_rejected_token() {
        let harness = Harness::new();
        harness.store.preload("stale", test_user("1"));
        harness.api.respond_profile(Err(api_error(401, None)));

        harness.service.initialize().await;

        assert!(!harness.service.session().is_authenticated);
        assert!(harness.store.slot().is_none());
        assert!(harness.api.token().is_none());
    }

    #[tokio::test]
    async fn test_initialize_discards_unreadable_store() {
        let harness = Harness::new();
        harness.store.poison();

        harness.service.initialize().await;

        assert!(!harness.service.session().is_authenticated);
        assert!(harness.store.cleared());
    }

    #[tokio::test]
    async fn test_initialize_stays_anonymous_on_empty_store() {
        let harness = Harness::new();

        harness.service.initialize().await;

        assert_eq!(harness.service.session(), Session::default());
    }

    #[tokio::test]
    async fn test_clear_error_only_drops_error() {
        let harness = Harness::new();
        harness.api.respond_login(Err(api_error(400, Some("nope"))));
        let _ = harness.service.login(credentials()).await;

        harness.service.clear_error();

        let session = harness.service.session();
        assert!(session.error.is_none());
        assert!(session.user.is_none());
        assert!(session.token.is_none());
        assert!(!session.is_authenticated);
    }

    #[test]
    fn test_unauthorized_teardown_empties_store_and_redirects() {
        let harness = Harness::new();
        harness.store.preload("tok123", test_user("1"));

        let policy = UnauthorizedTeardown::new(
            harness.store.clone(),
            harness.navigator.clone(),
            Arc::new(crate::usecases::support::NullTelemetry),
        );
        policy.on_unauthorized();

        assert!(harness.store.slot().is_none());
        assert_eq!(harness.navigator.last(), Some("/login".into()));
    }
}
