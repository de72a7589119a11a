//! Session-gated navigation guard.
//!
//! Every attempted route transition funnels through [`navigate`]: an
//! `Unknown` session is probed first (the only suspension point in the
//! guard), then a pure decision table over destination and authentication
//! produces the verdict. A check runs to completion once started; there is
//! no cancellation.

use crate::session::{Session, SessionState};

/// Named routes of the application. [`Route::Dashboard`] is the landing
/// route after login.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Pos,
    Expenses,
    History,
    Settings,
}

impl Route {
    /// Router name of the route, as used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Dashboard => "dashboard",
            Self::Pos => "pos",
            Self::Expenses => "expenses",
            Self::History => "history",
            Self::Settings => "settings",
        }
    }
}

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavDecision {
    Allow,
    RedirectToLogin,
    RedirectToDashboard,
}

impl NavDecision {
    /// The route actually entered when this decision is applied to
    /// `requested`.
    pub fn target(self, requested: Route) -> Route {
        match self {
            Self::Allow => requested,
            Self::RedirectToLogin => Route::Login,
            Self::RedirectToDashboard => Route::Dashboard,
        }
    }
}

/// Pure decision table over `(destination, authenticated)`. Only the login
/// route is special; every other route just requires authentication.
#[must_use]
pub fn decide(destination: Route, authenticated: bool) -> NavDecision {
    if destination != Route::Login && !authenticated {
        return NavDecision::RedirectToLogin;
    }
    if destination == Route::Login && authenticated {
        return NavDecision::RedirectToDashboard;
    }
    NavDecision::Allow
}

/// Guard for one attempted transition.
pub async fn navigate(session: &mut Session, destination: Route) -> NavDecision {
    if matches!(session.state(), SessionState::Unknown) {
        session.check_session().await;
    }
    let decision = decide(destination, session.is_authenticated());
    tracing::debug!(
        "guard: {} -> {:?} (authenticated: {})",
        destination.name(),
        decision,
        session.is_authenticated()
    );
    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUARDED: [Route; 5] = [
        Route::Dashboard,
        Route::Pos,
        Route::Expenses,
        Route::History,
        Route::Settings,
    ];

    #[test]
    fn unauthenticated_guarded_routes_redirect_to_login() {
        for route in GUARDED {
            assert_eq!(decide(route, false), NavDecision::RedirectToLogin);
            assert_eq!(decide(route, false).target(route), Route::Login);
        }
    }

    #[test]
    fn authenticated_guarded_routes_are_allowed() {
        for route in GUARDED {
            assert_eq!(decide(route, true), NavDecision::Allow);
            assert_eq!(decide(route, true).target(route), route);
        }
    }

    #[test]
    fn login_route_is_allowed_only_when_unauthenticated() {
        assert_eq!(decide(Route::Login, false), NavDecision::Allow);
        assert_eq!(
            decide(Route::Login, true),
            NavDecision::RedirectToDashboard
        );
        assert_eq!(
            decide(Route::Login, true).target(Route::Login),
            Route::Dashboard
        );
    }
}
