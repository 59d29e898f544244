//! Page view models.
//!
//! Every protected page is entered through [`PageContext::enter`], which
//! checks the session before anything else happens. A page then owns its
//! view state, loads it once on entry and exposes the mutations the screen
//! offers. Mutations follow one pattern: validate locally (no request on
//! failure), send, patch local state on success, leave it untouched and
//! surface the server's message on failure.

pub mod auth;
pub mod credit_analysis;
pub mod credit_education;
pub mod dashboard;
pub mod goals;
pub mod profile;
pub mod transactions;

use shared::{Session, ValidationError};
use tracing::warn;

use crate::router::{require_session, Redirect, Route};
use crate::services::api::{ApiClient, ApiError};
use crate::services::lifetime::PageLifetime;
use crate::session::SessionStore;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The entity only exists locally; its server id is not known yet
    #[error("\"{0}\" is still being saved. Refresh and try again.")]
    PendingEntity(String),
    #[error("No goal with id {0}")]
    NotFound(String),
}

/// Submit lifecycle of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
}

/// Everything a protected page needs to talk to the server on behalf of the
/// signed-in user
#[derive(Clone)]
pub struct PageContext {
    pub api: ApiClient,
    pub session: Session,
    pub lifetime: PageLifetime,
}

impl PageContext {
    /// Check the session for `route` and bind an authorized client to it
    pub fn enter(route: Route, api: &ApiClient, store: &dyn SessionStore) -> Result<Self, Redirect> {
        let session = require_session(route, store)?;
        Ok(Self::with_session(api, session))
    }

    pub fn with_session(api: &ApiClient, session: Session) -> Self {
        Self {
            api: api.authorized(&session),
            session,
            lifetime: PageLifetime::new(),
        }
    }

    pub fn email(&self) -> &str {
        &self.session.user_email
    }

    /// Abandon the page; in-flight results will be ignored
    pub fn leave(&self) {
        self.lifetime.cancel();
    }
}

/// Unwrap one member of a multi-resource load, degrading failures to `None`
pub(crate) fn degrade<T>(page: &str, resource: &str, result: Result<T, ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{}: {} unavailable, showing default: {}", page, resource, e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::services::test_server::FakeApi;
    use std::time::Duration;

    pub const EMAIL: &str = "alice@example.com";

    pub fn session() -> Session {
        Session {
            user_id: "usr_1a2b3c4d".to_string(),
            user_name: "alice".to_string(),
            user_email: EMAIL.to_string(),
            token: None,
        }
    }

    pub fn api(fake: &FakeApi) -> ApiClient {
        ApiClient::build(fake.base_url.clone(), Duration::from_secs(5)).unwrap()
    }

    pub fn context(fake: &FakeApi) -> PageContext {
        PageContext::with_session(&api(fake), session())
    }
}
