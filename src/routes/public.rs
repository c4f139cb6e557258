use super::RouteDescriptor;
use crate::views::View;

/// Public Routes
///
/// Pages reachable without a session. No guard is attached: these are the
/// targets every other guard falls back to.
pub fn public_routes() -> Vec<RouteDescriptor> {
    vec![
        // /login
        // Entry point; also where 401 responses and failed guards land.
        RouteDescriptor::view("/login", "Login", View::Login),
        // /register
        // Student self-registration.
        RouteDescriptor::view("/register", "Register", View::Register),
    ]
}
