use std::env;

/// AppConfig
///
/// Holds the portal's configuration. Loaded once at startup and shared by value
/// (it is pulled into handlers via FromRef, like the rest of the AppState).
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Origin of the attendance backend (scheme + host + port).
    pub api_origin: String,
    // Path prefix every API call is issued under.
    pub api_base_path: String,
    // JSON file backing the local session storage.
    pub storage_path: String,
    // Address the local shell server listens on.
    pub bind_addr: String,
    // Runtime environment marker. Controls the log format and fail-fast checks.
    pub env: Env,
}

/// Env
///
/// Runtime context. Local development gets forgiving defaults, Production
/// requires everything to be set explicitly.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

pub const DEFAULT_API_ORIGIN: &str = "http://localhost:5000";
pub const API_BASE_PATH: &str = "/api";
pub const DEFAULT_STORAGE_PATH: &str = "./portal_storage.json";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

impl Default for AppConfig {
    /// default
    ///
    /// Non-panicking configuration for tests; never reads the environment.
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            api_base_path: API_BASE_PATH.to_string(),
            storage_path: DEFAULT_STORAGE_PATH.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables (call `dotenv` first).
    ///
    /// # Panics
    /// Panics in Production when `PORTAL_API_ORIGIN` is not set.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let api_origin = match env {
            Env::Production => env::var("PORTAL_API_ORIGIN")
                .expect("FATAL: PORTAL_API_ORIGIN must be set in production."),
            Env::Local => env::var("PORTAL_API_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_API_ORIGIN.to_string()),
        };

        Self {
            api_origin,
            api_base_path: API_BASE_PATH.to_string(),
            storage_path: env::var("PORTAL_STORAGE_PATH")
                .unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string()),
            bind_addr: env::var("PORTAL_BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            env,
        }
    }

    /// Full base URL for API calls, e.g. `http://localhost:5000/api`.
    pub fn api_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_origin.trim_end_matches('/'),
            self.api_base_path.trim_start_matches('/')
        )
    }
}
