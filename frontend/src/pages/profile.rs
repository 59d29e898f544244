use shared::{UpdateUserRequest, UserProfile, ValidationError};
use tracing::{debug, info, warn};

use super::{FormStatus, MutationError, PageContext};
use crate::components::navbar;
use crate::router::{Redirect, Route};
use crate::services::api::{ApiClient, ApiError};
use crate::session::SessionStore;

pub const UPDATED_MESSAGE: &str = "✅ Profile updated successfully!";

/// Loaded profile plus the edit form
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub profile: Option<UserProfile>,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub status: FormStatus,
    pub message: Option<String>,
}

pub struct ProfilePage {
    ctx: PageContext,
    pub state: ProfileState,
}

impl ProfilePage {
    pub async fn open(api: &ApiClient, store: &dyn SessionStore) -> Result<Self, Redirect> {
        let ctx = PageContext::enter(Route::Profile, api, store)?;
        let mut page = Self::new(ctx);
        page.load().await;
        Ok(page)
    }

    pub fn new(ctx: PageContext) -> Self {
        let username = ctx.session.user_name.clone();
        Self {
            ctx,
            state: ProfileState {
                username,
                ..Default::default()
            },
        }
    }

    pub async fn load(&mut self) {
        let result = self.ctx.lifetime.run(self.ctx.api.get_user(self.ctx.email())).await;
        match result {
            Ok(profile) => {
                self.state.username = profile.username.clone();
                self.state.profile = Some(profile);
            }
            Err(ApiError::Cancelled) => debug!("Profile page left during load"),
            Err(e) => {
                warn!("Failed to load profile: {}", e);
                self.state.message = Some(format!("❌ {}", e));
            }
        }
    }

    /// Save the edit form. A new password is only sent when it matches its
    /// confirmation; the email is never editable.
    pub async fn update(&mut self, store: &dyn SessionStore) -> Result<(), MutationError> {
        self.state.message = None;
        let username = self.state.username.trim().to_string();
        let password = self.state.password.clone();

        let checked = if username.is_empty() {
            Err(ValidationError::MissingFields)
        } else if !password.is_empty() && password != self.state.confirm_password {
            Err(ValidationError::PasswordMismatch)
        } else {
            Ok(())
        };
        if let Err(e) = checked {
            self.state.message = Some(e.to_string());
            return Err(e.into());
        }

        let request = UpdateUserRequest {
            email: self.ctx.email().to_string(),
            username: username.clone(),
            password: (!password.is_empty()).then_some(password),
        };
        self.state.status = FormStatus::Submitting;
        let result = self.ctx.lifetime.run(self.ctx.api.update_user(&request)).await;

        if let Err(e) = result {
            self.state.status = FormStatus::Idle;
            if e != ApiError::Cancelled {
                warn!("Profile update failed: {}", e);
                self.state.message = Some(format!("❌ {}", e));
            }
            return Err(e.into());
        }

        if let Some(profile) = self.state.profile.as_mut() {
            profile.username = username.clone();
        }
        self.state.password.clear();
        self.state.confirm_password.clear();
        self.state.status = FormStatus::Succeeded;
        self.state.message = Some(UPDATED_MESSAGE.to_string());

        self.ctx.session.user_name = username;
        if let Err(e) = store.set(&self.ctx.session) {
            warn!("Profile saved but the stored session was not refreshed: {:#}", e);
        }
        info!("Profile updated for {}", self.ctx.email());
        Ok(())
    }

    pub fn leave(&self) {
        self.ctx.leave();
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![navbar::render(Route::Profile), String::new()];
        let email = self
            .state
            .profile
            .as_ref()
            .map(|profile| profile.email.as_str())
            .unwrap_or(self.ctx.email());
        lines.push(format!("Username: {}", self.state.username));
        lines.push(format!("Email:    {} (cannot be changed)", email));
        if let Some(message) = &self.state.message {
            lines.push(String::new());
            lines.push(message.clone());
        }
        lines
    }
}
