//! HTTP client wrapper for the attendance backend.
//!
//! Every call goes through two interceptors:
//! - the request interceptor attaches `Authorization: Bearer <token>` when a
//!   token is cached;
//! - the response interceptor unwraps the JSON payload, and on 401 clears the
//!   session, navigates to `/login` and returns [`ApiError::Unauthorized`].
//!
//! Endpoint groups live in the submodules as further `impl ApiClient` blocks.

pub mod admin;
pub mod auth;
pub mod student;
pub mod teacher;

use reqwest::{Method, RequestBuilder, Response, StatusCode, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::ApiError,
    models::MessageResponse,
    navigator::Navigator,
    routes::guard::LOGIN_PATH,
    session::SessionStore,
};

/// ApiClient
///
/// Shared HTTP client bound to the backend base URL (`<origin>/api`). Cheap to
/// clone; clones share the connection pool, the session and the navigator.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    session: Arc<SessionStore>,
    navigator: Arc<Navigator>,
}

impl ApiClient {
    /// Builds the client over a cookie-keeping `reqwest::Client`, so backends
    /// that authenticate by session cookie work alongside bearer tokens.
    pub fn new(
        config: &AppConfig,
        session: Arc<SessionStore>,
        navigator: Arc<Navigator>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(http, &config.api_url(), session, navigator))
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        session: Arc<SessionStore>,
        navigator: Arc<Navigator>,
    ) -> Self {
        Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            session,
            navigator,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Absolute URL for an API path such as `/student/courses`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // --- Request Interceptor ---

    /// Attaches the bearer token if one is cached; otherwise leaves the request untouched.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.reader().token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Starts a request against `path` with the interceptor and the POST
    /// content-type default applied.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method.clone(), self.endpoint(path));
        let builder = if method == Method::POST {
            builder.header(CONTENT_TYPE, "application/json")
        } else {
            builder
        };
        self.authorize(builder)
    }

    // --- Response Interceptor ---

    /// Sends a prepared request and unwraps its JSON payload.
    pub async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        self.intercept(response).await
    }

    async fn intercept<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %response.url(), "backend rejected credentials");
            self.expire_session();
            return Err(ApiError::Unauthorized);
        }

        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<MessageResponse>(&bytes)
                .map(|body| body.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            tracing::debug!(%status, %message, "backend returned an error");
            return Err(ApiError::Status { status, message });
        }

        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(body).map_err(ApiError::Decode)
    }

    /// Clears the cached session and sends the user to the login page.
    fn expire_session(&self) {
        if let Err(e) = self.session.clear() {
            tracing::error!(error = %e, "failed to clear session after 401");
        }
        if let Err(e) = self.navigator.push(LOGIN_PATH) {
            tracing::error!(error = %e, "failed to navigate to login after 401");
        }
    }

    // --- Verb Helpers ---

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// POST without a body; still sent as `application/json`.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, path)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::DELETE, path)).await
    }
}
