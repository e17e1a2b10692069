//! Bearer-token HTTP client for the backend.

use std::sync::{Arc, RwLock};

use application::dto::AuthResponse;
use application::error::{ApplicationError, Result, ToInternal};
use application::ports::outbound::{AuthApi, UnauthorizedHandler};
use async_trait::async_trait;
use domain::auth::{LoginCredentials, RegisterData};
use domain::identity::User;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::models::{ErrorBody, LoginBody, RegisterBody, SearchBody};

/// Uniform HTTP access to the backend with token attachment and
/// centralized 401 handling.
///
/// Holds a single mutable bearer token in memory; the durable copy is
/// owned by the session container, which installs the value through
/// [`AuthApi::set_token`]. Constructed explicitly and passed in, so tests
/// can point it at a stub backend.
pub struct HttpApiClient {
    base_url: Url,
    http: reqwest::Client,
    token: RwLock<Option<String>>,
    unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl HttpApiClient {
    /// Create a new [`HttpApiClient`] against `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
            token: RwLock::new(None),
            unauthorized: None,
        }
    }

    /// Attach the global 401 policy fired on any unauthorized response.
    pub fn with_unauthorized_handler(
        mut self,
        handler: Arc<dyn UnauthorizedHandler>,
    ) -> Self {
        self.unauthorized = Some(handler);
        self
    }

    /// Browser-redirect target for third-party sign-in. Pure string
    /// templating; the provider segment is free-form.
    pub fn oauth_url(&self, provider: &str) -> String {
        format!(
            "{}/api/auth/oauth/{}",
            self.base_url.as_str().trim_end_matches('/'),
            provider
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).catch()
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    /// Sends `request` with the bearer token attached when present, maps
    /// non-success statuses to [`ApplicationError::Api`] and escalates any
    /// 401 to the global teardown policy before propagating it.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let request = match self.current_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.catch()?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Blunt global policy: any 401 anywhere invalidates the whole
            // session, stale in-flight requests included.
            self.clear_token();
            if let Some(handler) = &self.unauthorized {
                handler.on_unauthorized();
            }
        }

        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail);
            return Err(ApplicationError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response =
            self.execute(self.http.get(self.endpoint(path)?)).await?;
        response.json().await.catch()
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(self.http.post(self.endpoint(path)?).json(body))
            .await?;
        response.json().await.catch()
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(self.http.put(self.endpoint(path)?).json(body))
            .await?;
        response.json().await.catch()
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response =
            self.execute(self.http.delete(self.endpoint(path)?)).await?;
        response.json().await.catch()
    }

    /// POST without a body, for endpoints that rely on the bearer token
    /// alone.
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response =
            self.execute(self.http.post(self.endpoint(path)?)).await?;
        response.json().await.catch()
    }

    /// Liveness probe; polled periodically by the presentation layer.
    pub async fn health(&self) -> Result<serde_json::Value> {
        self.get("/api/health").await
    }

    /// Document listing for the landing page.
    pub async fn documents(&self) -> Result<serde_json::Value> {
        self.get("/api/documents").await
    }

    /// Full-text search query.
    pub async fn search(&self, query: &str) -> Result<serde_json::Value> {
        self.post("/api/search", &SearchBody { query }).await
    }
}

#[async_trait]
impl AuthApi for HttpApiClient {
    async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthResponse> {
        self.post(
            "/api/auth/login",
            &LoginBody {
                email: credentials.email(),
                password: credentials.password(),
            },
        )
        .await
    }

    async fn register(&self, data: &RegisterData) -> Result<AuthResponse> {
        self.post(
            "/api/auth/register",
            &RegisterBody {
                email: data.email(),
                username: data.username(),
                password: data.password(),
                full_name: data.full_name(),
            },
        )
        .await
    }

    async fn refresh(&self) -> Result<AuthResponse> {
        self.post_empty("/api/auth/refresh").await
    }

    async fn logout(&self) -> Result<()> {
        self.execute(self.http.post(self.endpoint("/api/auth/logout")?))
            .await?;
        Ok(())
    }

    async fn fetch_profile(&self) -> Result<User> {
        self.get("/api/auth/profile").await
    }

    fn set_token(&self, token: &str) {
        *self.token.write().expect("token lock poisoned") =
            Some(token.to_string());
    }

    fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }
}
