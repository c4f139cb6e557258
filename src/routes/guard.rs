//! Navigation guards.
//!
//! Guards are UX-level checks: they keep users out of pages their cached role
//! does not cover. The backend still authorizes every API call.

use std::sync::Arc;

use super::Location;
use crate::{models::Role, session::SessionReader};

/// Where unauthenticated or mis-scoped users are sent.
pub const LOGIN_PATH: &str = "/login";

/// Outcome of a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Redirect(String),
}

impl Decision {
    pub fn to_login() -> Self {
        Decision::Redirect(LOGIN_PATH.to_string())
    }
}

/// Guard signature: `(to, from, session) -> decision`.
pub type Guard = Arc<dyn Fn(&Location, Option<&Location>, &SessionReader) -> Decision + Send + Sync>;

/// role_guard
///
/// Builds the entry guard of a role subtree. The guard proceeds only when the
/// cached user parses and carries exactly `required`; a missing or malformed
/// user and any other role all send the user to `/login`.
pub fn role_guard(required: Role) -> Guard {
    Arc::new(move |to: &Location, _from: Option<&Location>, session: &SessionReader| {
        let Some(user) = session.user() else {
            tracing::debug!(path = %to.path, required = %required, "no session, redirecting to login");
            return Decision::to_login();
        };

        if permits(required, user.role) {
            tracing::debug!(path = %to.path, role = %user.role, "role guard passed");
            Decision::Proceed
        } else {
            tracing::debug!(
                path = %to.path,
                required = %required,
                actual = %user.role,
                "role mismatch, redirecting to login"
            );
            Decision::to_login()
        }
    })
}

fn permits(required: Role, actual: Role) -> bool {
    match (required, actual) {
        (Role::Student, Role::Student) => true,
        (Role::Teacher, Role::Teacher) => true,
        (Role::Admin, Role::Admin) => true,
        (Role::Student | Role::Teacher | Role::Admin, _) => false,
    }
}

/// Global hook run before every navigation hop. Diagnostic only.
pub fn before_each(to: &Location, from: Option<&Location>) -> Decision {
    tracing::info!(
        to = %to.path,
        from = from.map(|l| l.path.as_str()).unwrap_or("<initial>"),
        "navigating"
    );
    Decision::Proceed
}
