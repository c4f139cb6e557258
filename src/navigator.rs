use std::{
    collections::VecDeque,
    sync::{Arc, PoisonError, RwLock},
};

use crate::{
    error::NavigationError,
    routes::{Location, Navigation, RouteTable},
    session::SessionReader,
};

/// Landed paths kept in the navigator's history; older entries are dropped.
pub const HISTORY_LIMIT: usize = 64;

#[derive(Default)]
struct NavState {
    current: Option<Navigation>,
    history: VecDeque<String>,
}

/// Navigator
///
/// Owns the current client location. Every `push` resolves through the route
/// table against the live session, so a cleared session immediately changes
/// where guarded paths lead.
pub struct Navigator {
    table: Arc<RouteTable>,
    session: SessionReader,
    state: RwLock<NavState>,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>, session: SessionReader) -> Self {
        Self {
            table,
            session,
            state: RwLock::new(NavState::default()),
        }
    }

    pub fn push(&self, path: &str) -> Result<Navigation, NavigationError> {
        let from = self.current();
        let navigation = self.table.resolve(path, from.as_ref(), &self.session)?;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.history.len() == HISTORY_LIMIT {
            state.history.pop_front();
        }
        state.history.push_back(navigation.location.path.clone());
        state.current = Some(navigation.clone());

        if navigation.redirected {
            tracing::info!(
                requested = %navigation.requested,
                landed = %navigation.location.path,
                "navigation redirected"
            );
        }
        Ok(navigation)
    }

    pub fn current(&self) -> Option<Location> {
        self.last().map(|navigation| navigation.location)
    }

    /// The navigation that produced the current location.
    pub fn last(&self) -> Option<Navigation> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    /// Paths the navigator has landed on, oldest first, at most
    /// [`HISTORY_LIMIT`] of them.
    pub fn history(&self) -> Vec<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .iter()
            .cloned()
            .collect()
    }
}
