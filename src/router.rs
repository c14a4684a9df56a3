//! Routing Module
//!
//! Client-side routes, the navigation guard and the router that tracks the
//! current route.

use serde::Serialize;
use std::sync::Mutex;
use tracing::debug;

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Transactions,
    Savings,
    Budget,
    Reports,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Transactions,
        Route::Savings,
        Route::Budget,
        Route::Reports,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/",
            Route::Transactions => "/transactions",
            Route::Savings => "/savings",
            Route::Budget => "/budget",
            Route::Reports => "/reports",
        }
    }

    /// Resolve a path, ignoring a trailing slash. Unknown paths are `None`.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|route| route.path() == normalized)
    }

    /// Whether the route requires an access credential
    pub fn is_protected(self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

/// Sidebar entry shown by the application layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub route: Route,
    pub path: &'static str,
    pub label: &'static str,
}

/// Links of the authenticated layout, in display order
pub fn nav_links() -> Vec<NavLink> {
    [
        (Route::Dashboard, "Dashboard"),
        (Route::Transactions, "Transactions"),
        (Route::Savings, "Savings"),
        (Route::Budget, "Budget"),
        (Route::Reports, "Reports"),
    ]
    .into_iter()
    .map(|(route, label)| NavLink {
        route,
        path: route.path(),
        label,
    })
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "route", rename_all = "snake_case")]
pub enum GuardOutcome {
    Render(Route),
    Redirect(Route),
}

impl GuardOutcome {
    /// The route that ends up displayed
    pub fn route(self) -> Route {
        match self {
            GuardOutcome::Render(route) | GuardOutcome::Redirect(route) => route,
        }
    }
}

/// Decide what a navigation to `route` displays for the given session.
///
/// Presentation gate only: the backend still authorizes every request.
pub fn guard(route: Route, session: &Session) -> GuardOutcome {
    let authenticated = session.is_authenticated();

    match (route.is_protected(), authenticated) {
        (true, false) => GuardOutcome::Redirect(Route::Login),
        (false, true) => GuardOutcome::Redirect(Route::Dashboard),
        _ => GuardOutcome::Render(route),
    }
}

/// Something that can move the UI to another route
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

type RouteListener = Box<dyn Fn(Route) + Send + Sync>;

/// Tracks the current route and notifies an optional listener
pub struct Router {
    current: Mutex<Route>,
    listener: Option<RouteListener>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Route::Login),
            listener: None,
        }
    }

    /// Router that calls `listener` after every navigation
    pub fn with_listener(listener: impl Fn(Route) + Send + Sync + 'static) -> Self {
        Self {
            current: Mutex::new(Route::Login),
            listener: Some(Box::new(listener)),
        }
    }

    pub fn current(&self) -> Route {
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Resolve `path`, apply the guard and navigate to the outcome.
    /// Unknown paths resolve to the dashboard.
    pub fn visit(&self, path: &str, session: &Session) -> GuardOutcome {
        let route = Route::from_path(path).unwrap_or(Route::Dashboard);
        let outcome = guard(route, session);
        self.navigate(outcome.route());
        outcome
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route) {
        debug!("Navigating to {}", route.path());
        {
            let mut current = self
                .current
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *current = route;
        }
        if let Some(listener) = &self.listener {
            listener(route);
        }
    }
}
