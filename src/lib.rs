use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Client core: session cache, route table, navigation and the backend client.
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod navigator;
pub mod session;
pub mod storage;
pub mod views;

// Client route table, split into public and per-role subtrees.
pub mod routes;

// Local shell server handlers.
pub mod handlers;

// --- Public Re-exports ---

pub use api::ApiClient;
pub use config::AppConfig;
pub use navigator::Navigator;
pub use routes::RouteTable;
pub use session::{SessionReader, SessionStore};
pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageState};

/// ApiDoc
///
/// OpenAPI description of the shell server, served at `/api-docs/openapi.json`
/// and browsable under `/swagger-ui`.
/// The backend proxy under `/api` is pass-through and not described here.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health, handlers::navigate, handlers::current_session,
        handlers::login, handlers::logout
    ),
    components(
        schemas(
            handlers::NavigationResponse, handlers::SessionResponse, handlers::LoginOutcome,
            models::LoginRequest, models::Role, views::View,
        )
    ),
    tags(
        (name = "attendance-portal", description = "Attendance portal client shell")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Everything the shell handlers need. Handlers that only inspect the session
/// pull a `SessionReader` via FromRef; writes go through the API client.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionStore>,
    pub navigator: Arc<Navigator>,
    pub api: ApiClient,
}

impl AppState {
    /// assemble
    ///
    /// Wires storage, session, route table, navigator and API client together
    /// for the given configuration.
    pub fn assemble(config: &AppConfig, storage: StorageState) -> Result<Self, error::ApiError> {
        let session = Arc::new(SessionStore::new(storage));
        let table = Arc::new(RouteTable::portal());
        let navigator = Arc::new(Navigator::new(table, session.reader()));
        let api = ApiClient::new(config, session.clone(), navigator.clone())?;

        Ok(Self {
            session,
            navigator,
            api,
        })
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for ApiClient {
    fn from_ref(app_state: &AppState) -> ApiClient {
        app_state.api.clone()
    }
}

impl FromRef<AppState> for Arc<Navigator> {
    fn from_ref(app_state: &AppState) -> Arc<Navigator> {
        app_state.navigator.clone()
    }
}

impl FromRef<AppState> for SessionReader {
    fn from_ref(app_state: &AppState) -> SessionReader {
        app_state.session.reader()
    }
}

/// create_router
///
/// Assembles the shell server: navigation and session endpoints, the backend
/// proxy, and the request-id / tracing / CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health))
        // Client-side navigation through the guarded route table.
        .route("/navigate", get(handlers::navigate))
        // Session lifecycle.
        .route("/session", get(handlers::current_session))
        .route("/session/login", post(handlers::login))
        .route("/session/logout", post(handlers::logout))
        // Backend reads, through the bearer/401 interceptors.
        .route("/api/{*path}", get(handlers::proxy_get))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for each shell request, tagged with its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "shell_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
