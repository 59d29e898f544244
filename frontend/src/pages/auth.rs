//! Sign-in and sign-up forms.

use shared::{LoginRequest, Session, SignupRequest, ValidationError};
use tracing::{error, info, warn};

use super::FormStatus;
use crate::router::Route;
use crate::services::api::ApiClient;
use crate::session::SessionStore;

pub const LOGIN_FAILED: &str = "Login failed";
pub const SIGNUP_NOTICE: &str = "✅ Account created successfully! You can now log in.";

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub status: FormStatus,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Authenticate and persist the session. Returns where to go next, or
    /// `None` with `error` set when the form stays on screen.
    pub async fn submit(&mut self, api: &ApiClient, store: &dyn SessionStore) -> Option<Route> {
        self.error = None;
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            self.error = Some(ValidationError::MissingFields.to_string());
            return None;
        }

        self.status = FormStatus::Submitting;
        let request = LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
        };

        let response = match api.login(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Login failed for {}: {}", request.email, e);
                self.status = FormStatus::Idle;
                self.error = Some(e.message_or(LOGIN_FAILED));
                return None;
            }
        };

        let session = Session::from_login(response);
        if let Err(e) = store.set(&session) {
            error!("Failed to persist session: {:#}", e);
            self.status = FormStatus::Idle;
            self.error = Some(format!("Could not save your session: {}", e));
            return None;
        }

        info!("✅ Signed in as {}", session.user_email);
        self.password.clear();
        self.status = FormStatus::Succeeded;
        Some(Route::Dashboard)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub status: FormStatus,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl SignupForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Create the account. No session is stored; the user signs in next.
    pub async fn submit(&mut self, api: &ApiClient) -> Option<Route> {
        self.error = None;
        self.notice = None;
        let (name, email) = (self.name.trim(), self.email.trim());
        if name.is_empty() || email.is_empty() || self.password.is_empty() {
            self.error = Some(ValidationError::MissingFields.to_string());
            return None;
        }

        self.status = FormStatus::Submitting;
        let request = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        };

        match api.signup(&request).await {
            Ok(_) => {
                info!("Account created for {}", request.email);
                self.password.clear();
                self.status = FormStatus::Succeeded;
                self.notice = Some(SIGNUP_NOTICE.to_string());
                Some(Route::Login)
            }
            Err(e) => {
                warn!("Signup failed for {}: {}", request.email, e);
                self.status = FormStatus::Idle;
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::fixtures;
    use crate::services::test_server::FakeApi;
    use crate::session::MemorySessionStore;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_login_stores_session_and_goes_to_dashboard() {
        let fake = FakeApi::start().await;
        fake.respond(
            "POST",
            "/login",
            200,
            json!({
                "message": "Login successful",
                "user": {"id": 9, "name": "alice", "email": "alice@example.com"},
                "token": "tok_abc"
            }),
        );
        let store = MemorySessionStore::new();
        let mut form = LoginForm::new("alice@example.com", "hunter22");

        let next = form.submit(&fixtures::api(&fake), &store).await;

        assert_eq!(next, Some(Route::Dashboard));
        assert_eq!(form.status, FormStatus::Succeeded);
        let session = store.get().unwrap().unwrap();
        assert_eq!(session.user_id, "9");
        assert_eq!(session.token.as_deref(), Some("tok_abc"));
    }

    #[tokio::test]
    async fn test_rejected_login_shows_server_detail() {
        let fake = FakeApi::start().await;
        fake.respond("POST", "/login", 401, json!({"detail": "Invalid email or password"}));
        let store = MemorySessionStore::new();
        let mut form = LoginForm::new("alice@example.com", "wrong");

        let next = form.submit(&fixtures::api(&fake), &store).await;

        assert_eq!(next, None);
        assert_eq!(form.status, FormStatus::Idle);
        assert_eq!(form.error.as_deref(), Some("Invalid email or password"));
        assert!(store.get().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejection_without_detail_says_login_failed() {
        let fake = FakeApi::start().await;
        fake.respond_raw("POST", "/login", 500, "");
        let mut form = LoginForm::new("alice@example.com", "hunter22");

        form.submit(&fixtures::api(&fake), &MemorySessionStore::new()).await;

        assert_eq!(form.error.as_deref(), Some(LOGIN_FAILED));
        assert_eq!(form.status, FormStatus::Idle);
    }

    #[tokio::test]
    async fn test_unreachable_server_message() {
        let api = ApiClient::build("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let store = MemorySessionStore::new();
        let mut form = LoginForm::new("alice@example.com", "hunter22");

        form.submit(&api, &store).await;

        assert_eq!(form.error.as_deref(), Some("Unable to connect to server"));
    }

    #[tokio::test]
    async fn test_empty_login_sends_nothing() {
        let fake = FakeApi::start().await;
        let mut form = LoginForm::new("", "");

        form.submit(&fixtures::api(&fake), &MemorySessionStore::new()).await;

        assert_eq!(form.error.as_deref(), Some("Please fill all fields."));
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn test_signup_routes_to_login_without_session() {
        let fake = FakeApi::start().await;
        fake.respond("POST", "/signup", 200, json!({"message": "User created"}));
        let mut form = SignupForm::new("Alice", "alice@example.com", "hunter22");

        let next = form.submit(&fixtures::api(&fake)).await;

        assert_eq!(next, Some(Route::Login));
        assert_eq!(form.notice.as_deref(), Some(SIGNUP_NOTICE));
        assert_eq!(
            fake.requests_to("POST", "/signup")[0].body,
            json!({"name": "Alice", "email": "alice@example.com", "password": "hunter22"})
        );
    }

    #[tokio::test]
    async fn test_duplicate_signup_keeps_form() {
        let fake = FakeApi::start().await;
        fake.respond("POST", "/signup", 400, json!({"detail": "Email already registered"}));
        let mut form = SignupForm::new("Alice", "alice@example.com", "hunter22");

        assert_eq!(form.submit(&fixtures::api(&fake)).await, None);
        assert_eq!(form.error.as_deref(), Some("Email already registered"));
        assert_eq!(form.password, "hunter22");
    }
}
