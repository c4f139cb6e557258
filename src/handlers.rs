use axum::{
    Json,
    extract::{Path, Query, RawQuery, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::ApiClient,
    error::{ApiError, PortalError},
    models::{LoginRequest, Role, SessionUser},
    navigator::Navigator,
    routes::{Navigation, guard::LOGIN_PATH},
    session::SessionReader,
    views::View,
};

// --- Request / Response Shapes ---

/// NavigateQuery
///
/// Query parameters of `GET /navigate`.
#[derive(Deserialize, IntoParams)]
pub struct NavigateQuery {
    /// Client path to navigate to, e.g. `/teacher/attendance`.
    pub path: String,
}

/// NavigationResponse
///
/// What the client should mount after a navigation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NavigationResponse {
    pub requested: String,
    pub path: String,
    pub route_name: Option<String>,
    pub view: View,
    pub component: String,
    pub redirected: bool,
}

impl From<Navigation> for NavigationResponse {
    fn from(navigation: Navigation) -> Self {
        Self {
            requested: navigation.requested,
            path: navigation.location.path,
            route_name: navigation.route_name.map(str::to_string),
            view: navigation.view,
            component: navigation.component.to_string(),
            redirected: navigation.redirected,
        }
    }
}

/// SessionResponse
///
/// Read-only snapshot of the cached session. Never includes the token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub role: Option<Role>,
    #[schema(value_type = Option<Object>)]
    pub user: Option<SessionUser>,
}

/// LoginOutcome
///
/// The logged-in user plus the navigation to their role's home page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginOutcome {
    #[schema(value_type = Object)]
    pub user: SessionUser,
    pub navigation: NavigationResponse,
}

// --- Handlers ---

/// health
///
/// Liveness probe.
#[utoipa::path(get, path = "/health", responses((status = 200, description = "Alive", body = String)))]
pub async fn health() -> &'static str {
    "ok"
}

/// navigate
///
/// Resolves a client path through the route table against the cached session
/// and records it as the current location. Guard denials are not errors: the
/// response simply lands on `/login` with `redirected = true`.
#[utoipa::path(
    get,
    path = "/navigate",
    params(NavigateQuery),
    responses(
        (status = 200, description = "Navigation completed", body = NavigationResponse),
        (status = 404, description = "No route matches the path")
    )
)]
pub async fn navigate(
    State(navigator): State<Arc<Navigator>>,
    Query(query): Query<NavigateQuery>,
) -> Result<Json<NavigationResponse>, PortalError> {
    let navigation = navigator.push(&query.path)?;
    Ok(Json(navigation.into()))
}

/// current_session
///
/// Reports whether a usable session is cached and for which role.
#[utoipa::path(
    get,
    path = "/session",
    responses((status = 200, description = "Session snapshot", body = SessionResponse))
)]
pub async fn current_session(State(session): State<SessionReader>) -> Json<SessionResponse> {
    let user = session.session().map(|session| session.user);
    Json(SessionResponse {
        authenticated: user.is_some(),
        role: user.as_ref().map(|user| user.role),
        user,
    })
}

/// login
///
/// Logs in against the backend, caches the session and navigates to the
/// role's dashboard.
#[utoipa::path(
    post,
    path = "/session/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginOutcome),
        (status = 401, description = "Wrong credentials")
    )
)]
pub async fn login(
    State(api): State<ApiClient>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginOutcome>, PortalError> {
    let user = api.login(&request).await?;
    let navigation = api.navigator().push(user.role.home_path())?;
    Ok(Json(LoginOutcome {
        user,
        navigation: navigation.into(),
    }))
}

/// logout
///
/// Ends the session locally and at the backend. A backend that already
/// considers the session gone is not an error.
#[utoipa::path(
    post,
    path = "/session/logout",
    responses((status = 200, description = "Logged out", body = NavigationResponse))
)]
pub async fn logout(State(api): State<ApiClient>) -> Result<Json<NavigationResponse>, PortalError> {
    match api.logout().await {
        Ok(()) | Err(ApiError::Unauthorized) => {}
        Err(ApiError::Storage(e)) => return Err(ApiError::Storage(e).into()),
        Err(e) => tracing::warn!(error = %e, "backend logout failed, local session cleared anyway"),
    }
    // The client has normally navigated to login already.
    let navigation = match api.navigator().last() {
        Some(navigation) if navigation.location.path == LOGIN_PATH => navigation,
        _ => api.navigator().push(LOGIN_PATH)?,
    };
    Ok(Json(navigation.into()))
}

/// proxy_get
///
/// Forwards `GET /api/{path}` to the backend through the interceptors and
/// returns only the payload. A 401 clears the session before it is relayed.
/// Paths with `.` or `..` segments are refused before anything is sent.
pub async fn proxy_get(
    State(api): State<ApiClient>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, PortalError> {
    if path.split(['/', '\\']).any(|segment| segment == "." || segment == "..") {
        tracing::warn!(%path, "refusing to proxy dot-segment path");
        return Err(PortalError::InvalidPath(path));
    }
    let target = match query {
        Some(query) if !query.is_empty() => format!("{path}?{query}"),
        _ => path,
    };
    let payload: Value = api.get(&target).await?;
    Ok(Json(payload))
}
