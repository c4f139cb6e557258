/// Client Route Table
///
/// Maps client paths to views. The table is split the same way access is:
/// public pages, then one subtree per role. Each role subtree carries a single
/// entry guard that gates all of its children uniformly.

/// Login and registration pages, reachable without a session.
pub mod public;

/// `/student/*`, gated by the student role guard.
pub mod student;

/// `/teacher/*`, gated by the teacher role guard.
pub mod teacher;

/// `/admin/*`, gated by the admin role guard.
pub mod admin;

/// Guard functions and the global before-each hook.
pub mod guard;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::NavigationError,
    session::SessionReader,
    views::{View, ViewLoader},
};
use guard::{Decision, Guard};

/// Redirect hops allowed before a navigation is declared a loop.
pub const MAX_REDIRECTS: usize = 8;

/// A resolved client location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Location {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl Location {
    /// Splits off query and fragment and normalizes the path: a leading `/`
    /// is enforced and a trailing `/` (other than the root) is dropped.
    pub fn parse(raw: &str) -> Self {
        let without_fragment = raw.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) if !query.is_empty() => (path, Some(query.to_string())),
            Some((path, _)) => (path, None),
            None => (without_fragment, None),
        };

        let trimmed = path.trim().trim_end_matches('/');
        let path = if trimmed.is_empty() {
            "/".to_string()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };

        Self { path, query }
    }
}

/// RouteDescriptor
///
/// One node of the static route table. Top-level paths are absolute, child
/// paths are relative to their parent.
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub view: Option<ViewLoader>,
    pub redirect: Option<&'static str>,
    pub guard: Option<Guard>,
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    /// A route that mounts `view`.
    pub fn view(path: &'static str, name: &'static str, view: View) -> Self {
        Self {
            path,
            name: Some(name),
            view: Some(ViewLoader::new(view)),
            redirect: None,
            guard: None,
            children: Vec::new(),
        }
    }

    /// A route that only forwards to `target`.
    pub fn redirect(path: &'static str, target: &'static str) -> Self {
        Self {
            path,
            name: None,
            view: None,
            redirect: Some(target),
            guard: None,
            children: Vec::new(),
        }
    }

    pub fn guarded(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn with_children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }
}

/// The outcome of a completed navigation.
#[derive(Debug, Clone)]
pub struct Navigation {
    /// The path as asked for, normalized.
    pub requested: String,
    /// Where the navigation ended up.
    pub location: Location,
    pub route_name: Option<&'static str>,
    pub view: View,
    pub component: &'static str,
    /// True when a redirect or a guard moved the navigation elsewhere.
    pub redirected: bool,
}

/// RouteTable
///
/// Static, built once at startup. Resolution runs the before-each hook, follows
/// redirects, runs the guards of every matched route (parent first) and finally
/// loads the leaf's view.
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDescriptor>) -> Self {
        Self { routes }
    }

    /// The attendance portal's full table.
    pub fn portal() -> Self {
        let mut routes = vec![RouteDescriptor::redirect("/", guard::LOGIN_PATH)];
        routes.extend(public::public_routes());
        routes.push(student::student_routes());
        routes.push(teacher::teacher_routes());
        routes.push(admin::admin_routes());
        Self::new(routes)
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Matched route chain for `path`, outermost first.
    fn match_path(&self, path: &str) -> Option<Vec<&RouteDescriptor>> {
        for route in &self.routes {
            if route.path == path {
                return Some(vec![route]);
            }
            let Some(rest) = path
                .strip_prefix(route.path)
                .and_then(|rest| rest.strip_prefix('/'))
            else {
                continue;
            };
            if route.path == "/" {
                continue;
            }
            if let Some(child) = route.children.iter().find(|child| child.path == rest) {
                return Some(vec![route, child]);
            }
        }
        None
    }

    /// resolve
    ///
    /// Resolves `raw` into the view that should be mounted. Guards that deny
    /// entry turn the navigation into a redirect; only unmatched paths and
    /// redirect cycles are errors.
    pub fn resolve(
        &self,
        raw: &str,
        from: Option<&Location>,
        session: &SessionReader,
    ) -> Result<Navigation, NavigationError> {
        let requested = Location::parse(raw);
        let mut target = requested.clone();
        let mut hops = 0;

        loop {
            guard::before_each(&target, from);

            let chain = self
                .match_path(&target.path)
                .ok_or_else(|| NavigationError::NotFound(target.path.clone()))?;

            let mut next_hop = chain.last().and_then(|leaf| leaf.redirect).map(str::to_string);

            if next_hop.is_none() {
                for route in &chain {
                    let Some(guard) = &route.guard else { continue };
                    if let Decision::Redirect(dest) = guard(&target, from, session) {
                        next_hop = Some(dest);
                        break;
                    }
                }
            }

            if let Some(dest) = next_hop {
                hops += 1;
                if hops > MAX_REDIRECTS {
                    tracing::warn!(path = %requested.path, "redirect loop detected");
                    return Err(NavigationError::RedirectLoop(requested.path));
                }
                target = Location::parse(&dest);
                continue;
            }

            let leaf = chain[chain.len() - 1];
            let loader = leaf
                .view
                .as_ref()
                .ok_or_else(|| NavigationError::NotFound(target.path.clone()))?;
            let loaded = loader.load();

            return Ok(Navigation {
                requested: requested.path,
                location: target,
                route_name: leaf.name,
                view: loaded.view,
                component: loaded.component,
                redirected: hops > 0,
            });
        }
    }
}
