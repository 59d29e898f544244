//! Routes and page gating.
//!
//! A protected page may only be entered with a stored session; otherwise the
//! visitor is redirected to sign-in before any request is issued.

use shared::Session;
use std::fmt;
use tracing::{info, warn};

use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Front,
    Login,
    Signup,
    Dashboard,
    Transactions,
    CreditEducation,
    CreditAnalysis,
    Profile,
}

impl Route {
    /// Links shown in the navigation bar, in order
    pub const NAV: [Route; 5] = [
        Route::Dashboard,
        Route::Transactions,
        Route::CreditEducation,
        Route::CreditAnalysis,
        Route::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Front => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Dashboard => "/dashboard",
            Route::Transactions => "/transactions",
            Route::CreditEducation => "/credit-education",
            Route::CreditAnalysis => "/credit-analysis",
            Route::Profile => "/profile",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Front => "Home",
            Route::Login => "Login",
            Route::Signup => "Sign up",
            Route::Dashboard => "Dashboard",
            Route::Transactions => "Transactions",
            Route::CreditEducation => "Credit Education",
            Route::CreditAnalysis => "Analysis",
            Route::Profile => "Profile",
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Front | Route::Login | Route::Signup)
    }

    pub fn from_path(path: &str) -> Option<Route> {
        [
            Route::Front,
            Route::Login,
            Route::Signup,
            Route::Dashboard,
            Route::Transactions,
            Route::CreditEducation,
            Route::CreditAnalysis,
            Route::Profile,
        ]
        .into_iter()
        .find(|route| route.path() == path)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation away from the requested page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect(pub Route);

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Redirecting to {}", self.0)
    }
}

/// Outcome of entering a route
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// Protected route, session present
    Granted(Session),
    /// Public route, enter without a session
    Public,
    Redirect(Redirect),
}

/// Decide whether `route` may be entered with what `store` holds.
///
/// An unreadable store counts as signed out. Visiting Login while signed in
/// goes straight to the dashboard.
pub fn guard(route: Route, store: &dyn SessionStore) -> Access {
    let session = match store.get() {
        Ok(session) => session,
        Err(e) => {
            warn!("Failed to read session, treating as signed out: {:#}", e);
            None
        }
    };

    match (route.is_protected(), session) {
        (true, Some(session)) => Access::Granted(session),
        (true, None) => {
            info!("No session for {}, redirecting to sign-in", route);
            Access::Redirect(Redirect(Route::Login))
        }
        (false, Some(_)) if route == Route::Login => Access::Redirect(Redirect(Route::Dashboard)),
        (false, _) => Access::Public,
    }
}

/// Enter a protected route or get the redirect
pub fn require_session(route: Route, store: &dyn SessionStore) -> Result<Session, Redirect> {
    match guard(route, store) {
        Access::Granted(session) => Ok(session),
        Access::Redirect(redirect) => Err(redirect),
        Access::Public => Err(Redirect(Route::Login)),
    }
}

/// Forget the signed-in user and go to sign-in
pub fn logout(store: &dyn SessionStore) -> anyhow::Result<Route> {
    store.clear()?;
    info!("👋 Logged out");
    Ok(Route::Login)
}
