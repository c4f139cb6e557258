use super::ApiClient;
use crate::{
    error::ApiError,
    models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, Session, SessionUser},
    routes::guard::LOGIN_PATH,
};

impl ApiClient {
    /// login
    ///
    /// `POST /auth/login`. On success the returned user, and the token when
    /// the backend issues one, are written to the session store as one unit
    /// and the user is returned. Cookie-authenticated backends send no token;
    /// their session cookie lives in the client's cookie store. Wrong
    /// credentials come back as 401 and go through the usual 401 handling.
    pub async fn login(&self, request: &LoginRequest) -> Result<SessionUser, ApiError> {
        let response: LoginResponse = self.post("/auth/login", request).await?;

        let session = Session {
            token: response.token.filter(|token| !token.is_empty()),
            user: response.user,
        };
        self.session.establish(&session)?;

        tracing::info!(
            username = response.username.as_deref().unwrap_or("<unknown>"),
            role = %session.user.role,
            "logged in"
        );
        Ok(session.user)
    }

    /// `POST /auth/register`. Does not log the new user in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ApiError> {
        self.post("/auth/register", request).await
    }

    /// logout
    ///
    /// `POST /auth/logout`. The local session is cleared and the user is sent
    /// to `/login` whatever the backend answers; the backend's error, if
    /// any, is still returned. A 401 has already done both.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.post_empty::<MessageResponse>("/auth/logout").await;

        if !matches!(result, Err(ApiError::Unauthorized)) {
            self.session.clear()?;
            if let Err(e) = self.navigator.push(LOGIN_PATH) {
                tracing::error!(error = %e, "failed to navigate to login after logout");
            }
        }

        result.map(|_| ())
    }

    /// `GET /auth/me`: the backend's view of the current user.
    pub async fn me(&self) -> Result<SessionUser, ApiError> {
        self.get("/auth/me").await
    }
}
