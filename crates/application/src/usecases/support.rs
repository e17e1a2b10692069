//! Fake ports for exercising the session container without a backend.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain::auth::{LoginCredentials, RegisterData};
use domain::identity::User;

use crate::dto::AuthResponse;
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::SessionLifecycle;
use crate::ports::outbound::{
    AuthApi, CredentialStore, Navigator, PersistedCredentials, TelemetryPort,
};
use crate::usecases::SessionService;

pub(crate) fn test_user(id: &str) -> User {
    User {
        id: id.into(),
        email: format!("{id}@example.com"),
        username: id.into(),
        ..Default::default()
    }
}

pub(crate) fn auth_response(user_id: &str, token: &str) -> AuthResponse {
    AuthResponse {
        user: test_user(user_id),
        access_token: token.into(),
        token_type: "bearer".into(),
        expires_in: 3600,
    }
}

/// Scriptable [`AuthApi`]: each endpoint serves the response it was primed
/// with, once. An unprimed endpoint panics, except logout which defaults to
/// success.
#[derive(Default)]
pub(crate) struct FakeApi {
    token: Mutex<Option<String>>,
    login_response: Mutex<Option<Result<AuthResponse>>>,
    register_response: Mutex<Option<Result<AuthResponse>>>,
    refresh_response: Mutex<Option<Result<AuthResponse>>>,
    profile_response: Mutex<Option<Result<User>>>,
    profile_pending: AtomicBool,
    logout_response: Mutex<Option<Result<()>>>,
    pub(crate) logout_calls: AtomicUsize,
}

impl FakeApi {
    pub(crate) fn respond_login(&self, response: Result<AuthResponse>) {
        *self.login_response.lock().unwrap() = Some(response);
    }

    pub(crate) fn respond_register(&self, response: Result<AuthResponse>) {
        *self.register_response.lock().unwrap() = Some(response);
    }

    pub(crate) fn respond_refresh(&self, response: Result<AuthResponse>) {
        *self.refresh_response.lock().unwrap() = Some(response);
    }

    pub(crate) fn respond_profile(&self, response: Result<User>) {
        *self.profile_response.lock().unwrap() = Some(response);
    }

    /// Make profile calls hang forever, as an in-flight verification.
    pub(crate) fn profile_never_resolves(&self) {
        self.profile_pending.store(true, Ordering::SeqCst);
    }

    pub(crate) fn respond_logout(&self, response: Result<()>) {
        *self.logout_response.lock().unwrap() = Some(response);
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn login(
        &self,
        _credentials: &LoginCredentials,
    ) -> Result<AuthResponse> {
        self.login_response
            .lock()
            .unwrap()
            .take()
            .expect("unexpected login call")
    }

    async fn register(&self, _data: &RegisterData) -> Result<AuthResponse> {
        self.register_response
            .lock()
            .unwrap()
            .take()
            .expect("unexpected register call")
    }

    async fn refresh(&self) -> Result<AuthResponse> {
        self.refresh_response
            .lock()
            .unwrap()
            .take()
            .expect("unexpected refresh call")
    }

    async fn logout(&self) -> Result<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.logout_response.lock().unwrap().take().unwrap_or(Ok(()))
    }

    async fn fetch_profile(&self) -> Result<User> {
        if self.profile_pending.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.profile_response
            .lock()
            .unwrap()
            .take()
            .expect("unexpected profile call")
    }

    fn set_token(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    fn clear_token(&self) {
        *self.token.lock().unwrap() = None;
    }
}

/// In-memory [`CredentialStore`] with a switch simulating unreadable data.
#[derive(Default)]
pub(crate) struct MemoryStore {
    slot: Mutex<Option<PersistedCredentials>>,
    poisoned: AtomicBool,
    clear_calls: AtomicUsize,
}

impl MemoryStore {
    pub(crate) fn preload(&self, token: &str, user: User) {
        *self.slot.lock().unwrap() = Some(PersistedCredentials {
            token: token.into(),
            user,
        });
    }

    /// Make subsequent loads fail as if the stored data were corrupt.
    pub(crate) fn poison(&self) {
        self.poisoned.store(true, Ordering::SeqCst);
    }

    pub(crate) fn slot(&self) -> Option<PersistedCredentials> {
        self.slot.lock().unwrap().clone()
    }

    pub(crate) fn cleared(&self) -> bool {
        self.clear_calls.load(Ordering::SeqCst) > 0
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<PersistedCredentials>> {
        if self.poisoned.load(Ordering::SeqCst) {
            return Err(ApplicationError::Storage(
                "stored user record is not valid JSON".into(),
            ));
        }
        Ok(self.slot.lock().unwrap().clone())
    }

    fn save(&self, credentials: &PersistedCredentials) -> Result<()> {
        *self.slot.lock().unwrap() = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        *self.slot.lock().unwrap() = None;
        self.poisoned.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Records the most recent destination instead of navigating.
#[derive(Default)]
pub(crate) struct FakeNavigator {
    last: Mutex<Option<String>>,
}

impl FakeNavigator {
    pub(crate) fn last(&self) -> Option<String> {
        self.last.lock().unwrap().clone()
    }
}

impl Navigator for FakeNavigator {
    fn to_login(&self, error: Option<&str>) {
        let destination = match error {
            Some(indicator) => format!("/login?error={indicator}"),
            None => "/login".to_string(),
        };
        *self.last.lock().unwrap() = Some(destination);
    }

    fn to_search(&self) {
        *self.last.lock().unwrap() = Some("/".to_string());
    }
}

pub(crate) struct NullTelemetry;

impl TelemetryPort for NullTelemetry {
    fn record_auth_success(&self, _user_id: &str, _method: &str) {}
    fn record_auth_failure(&self, _reason: &str) {}
    fn record_logout(&self, _forced: bool) {}
    fn record_session_rehydrated(&self, _user_id: &str) {}
}

/// A [`SessionService`] wired to fakes, with handles kept for assertions.
pub(crate) struct Harness {
    pub(crate) service: SessionService,
    pub(crate) api: Arc<FakeApi>,
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) navigator: Arc<FakeNavigator>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let api = Arc::new(FakeApi::default());
        let store = Arc::new(MemoryStore::default());
        let navigator = Arc::new(FakeNavigator::default());
        let service = SessionService::new(
            api.clone(),
            store.clone(),
            navigator.clone(),
            Arc::new(NullTelemetry),
        );

        Self {
            service,
            api,
            store,
            navigator,
        }
    }

    /// A harness whose session already completed a successful login.
    pub(crate) async fn authenticated(user_id: &str, token: &str) -> Self {
        let harness = Self::new();
        harness
            .api
            .respond_login(Ok(auth_response(user_id, token)));
        harness
            .service
            .login(LoginCredentials::new("a@b.com", "x").unwrap())
            .await
            .expect("login should succeed");
        harness
    }
}
