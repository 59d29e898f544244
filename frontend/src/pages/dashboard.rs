//! Dashboard: profile, balance summary, recent transactions, savings goals
//! and a motivation line, loaded together on entry.

use shared::{
    parse_positive_amount, AddGoalRequest, FinancialSummary, SavingsGoal, Transaction, UpdateProgressRequest,
    UserProfile, ValidationError,
};
use tracing::{debug, info, warn};

use super::goals::GoalBoard;
use super::{degrade, MutationError, PageContext};
use crate::components::{goal_card, navbar, stat_card, transaction_row};
use crate::router::{Redirect, Route};
use crate::services::api::{ApiClient, ApiError};
use crate::session::SessionStore;

pub const RECENT_TRANSACTIONS: usize = 6;
pub const MOTIVATION_FALLBACK: &str = "Keep pushing forward toward your savings goals! 💪";

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(SavingsGoal),
    /// The user declined the confirmation; nothing was sent
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub profile: Option<UserProfile>,
    pub transactions: Vec<Transaction>,
    pub goals: GoalBoard,
    pub motivation: String,
    pub loading: bool,
    pub message: Option<String>,
}

impl DashboardState {
    /// Always derived from the full transaction list
    pub fn summary(&self) -> FinancialSummary {
        FinancialSummary::from_transactions(&self.transactions)
    }

    pub fn recent_transactions(&self) -> &[Transaction] {
        let end = self.transactions.len().min(RECENT_TRANSACTIONS);
        &self.transactions[..end]
    }
}

pub struct DashboardPage {
    ctx: PageContext,
    pub state: DashboardState,
}

impl DashboardPage {
    /// Enter the dashboard and load it. No request is issued without a session.
    pub async fn open(api: &ApiClient, store: &dyn SessionStore) -> Result<Self, Redirect> {
        let ctx = PageContext::enter(Route::Dashboard, api, store)?;
        let mut page = Self::new(ctx);
        page.load().await;
        Ok(page)
    }

    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            state: DashboardState {
                motivation: MOTIVATION_FALLBACK.to_string(),
                ..Default::default()
            },
        }
    }

    /// Fetch all four resources concurrently. Each one that fails degrades
    /// to its empty state on its own.
    pub async fn load(&mut self) {
        self.state.loading = true;
        let email = self.ctx.email();
        let (api, lifetime) = (&self.ctx.api, &self.ctx.lifetime);

        let (profile, transactions, goals, motivation) = tokio::join!(
            lifetime.run(api.get_user(email)),
            lifetime.run(api.get_transactions(email)),
            lifetime.run(api.get_goals(email)),
            lifetime.run(api.get_motivation(email)),
        );

        if lifetime.is_cancelled() {
            debug!("Dashboard left during load, discarding results");
            return;
        }

        self.state.profile = degrade("Dashboard", "profile", profile);
        self.state.transactions = degrade("Dashboard", "transactions", transactions).unwrap_or_default();
        match degrade("Dashboard", "goals", goals) {
            Some(goals) => self.state.goals.reconcile(goals),
            None => self.state.goals = GoalBoard::default(),
        }
        self.state.motivation = degrade("Dashboard", "motivation", motivation)
            .flatten()
            .unwrap_or_else(|| MOTIVATION_FALLBACK.to_string());
        self.state.loading = false;

        info!(
            "Dashboard loaded: {} transactions, {} goals",
            self.state.transactions.len(),
            self.state.goals.len()
        );
    }

    /// Re-read goals and swap pending placeholders for server ids
    pub async fn refresh_goals(&mut self) -> Result<(), MutationError> {
        let result = self.ctx.lifetime.run(self.ctx.api.get_goals(self.ctx.email())).await;
        match result {
            Ok(goals) => {
                self.state.goals.reconcile(goals);
                Ok(())
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled.into()),
            Err(e) => {
                warn!("Failed to refresh goals: {}", e);
                self.state.message = Some(format!("❌ {}", e));
                Err(e.into())
            }
        }
    }

    pub async fn add_goal(&mut self, title: &str, goal_amount_input: &str) -> Result<(), MutationError> {
        let title = title.trim();
        let validated = if title.is_empty() {
            Err(ValidationError::MissingFields)
        } else {
            parse_positive_amount(goal_amount_input)
        };
        let goal_amount = self.validated(validated)?;

        let request = AddGoalRequest {
            email: self.ctx.email().to_string(),
            title: title.to_string(),
            goal_amount,
        };
        let result = self.ctx.lifetime.run(self.ctx.api.add_goal(&request)).await;
        let ack = self.send(result)?;

        let placeholder = self.state.goals.push_pending(title, goal_amount);
        info!("🎯 Goal '{}' created (pending {})", title, placeholder);
        self.state.message = Some(ack.message.unwrap_or_else(|| "✅ Goal added!".to_string()));
        Ok(())
    }

    /// Add to a goal's progress. Only confirmed goals can be updated.
    pub async fn update_goal_progress(
        &mut self,
        goal_id: &str,
        amount_input: &str,
    ) -> Result<SavingsGoal, MutationError> {
        self.confirmed_goal(goal_id)?;
        let amount = self.validated(parse_positive_amount(amount_input))?;

        let request = UpdateProgressRequest {
            challenge_id: goal_id.to_string(),
            amount,
        };
        let result = self
            .ctx
            .lifetime
            .run(self.ctx.api.update_goal_progress(&request))
            .await;
        let ack = self.send(result)?;

        let updated = self
            .state
            .goals
            .apply_progress(goal_id, amount)
            .ok_or_else(|| MutationError::NotFound(goal_id.to_string()))?;
        info!(
            "Goal {} progress {:.2}/{:.2}",
            goal_id, updated.progress, updated.goal_amount
        );
        self.state.message = Some(if updated.is_completed() {
            format!("🎉 Goal \"{}\" completed!", updated.title)
        } else {
            ack.message.unwrap_or_else(|| "✅ Progress updated!".to_string())
        });
        Ok(updated)
    }

    /// Delete a goal after `confirm` agrees. Declining sends nothing.
    pub async fn delete_goal<F>(&mut self, goal_id: &str, confirm: F) -> Result<DeleteOutcome, MutationError>
    where
        F: FnOnce(&SavingsGoal) -> bool,
    {
        let goal = self.confirmed_goal(goal_id)?;
        if !confirm(&goal) {
            debug!("Delete of goal {} declined", goal_id);
            return Ok(DeleteOutcome::Cancelled);
        }

        let result = self.ctx.lifetime.run(self.ctx.api.delete_goal(goal_id)).await;
        match result {
            Ok(_) => {
                let removed = self
                    .state
                    .goals
                    .remove(goal_id)
                    .ok_or_else(|| MutationError::NotFound(goal_id.to_string()))?;
                info!("🗑️ Goal {} deleted", goal_id);
                self.state.message = Some(format!("🗑️ Deleted \"{}\"", removed.title));
                Ok(DeleteOutcome::Deleted(removed))
            }
            Err(ApiError::Cancelled) => Err(ApiError::Cancelled.into()),
            Err(e) => {
                warn!("Failed to delete goal {}: {}", goal_id, e);
                self.state.message = Some(format!("❌ Failed to delete goal: {}", e));
                Err(e.into())
            }
        }
    }

    pub fn leave(&self) {
        self.ctx.leave();
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![navbar::render(Route::Dashboard), String::new()];

        let name = self
            .state
            .profile
            .as_ref()
            .map(|profile| profile.username.as_str())
            .unwrap_or(self.ctx.session.user_name.as_str());
        lines.push(format!("Welcome back, {} 👋", name));
        lines.push(self.state.motivation.clone());
        if let Some(message) = &self.state.message {
            lines.push(message.clone());
        }
        lines.push(String::new());

        lines.extend(stat_card::summary_cards(&self.state.summary()).iter().map(|card| card.render()));
        lines.push(String::new());

        lines.push("Recent Transactions".to_string());
        if self.state.transactions.is_empty() {
            lines.push("  No transactions yet.".to_string());
        } else {
            lines.extend(
                self.state
                    .recent_transactions()
                    .iter()
                    .map(|tx| format!("  {}", transaction_row::render(tx))),
            );
        }
        lines.push(String::new());

        lines.push("Savings Goals".to_string());
        if self.state.goals.is_empty() {
            lines.push("  No goals yet. Create one to start saving!".to_string());
        } else {
            for entry in self.state.goals.goals() {
                lines.extend(goal_card::render(entry).into_iter().map(|line| format!("  {}", line)));
            }
        }
        lines
    }

    fn confirmed_goal(&self, goal_id: &str) -> Result<SavingsGoal, MutationError> {
        let entry = self
            .state
            .goals
            .find(goal_id)
            .ok_or_else(|| MutationError::NotFound(goal_id.to_string()))?;
        if entry.is_pending() {
            return Err(MutationError::PendingEntity(entry.item.title.clone()));
        }
        Ok(entry.item.clone())
    }

    fn validated<T>(&mut self, result: Result<T, ValidationError>) -> Result<T, MutationError> {
        result.map_err(|e| {
            self.state.message = Some(e.to_string());
            MutationError::from(e)
        })
    }

    fn send<T>(&mut self, result: Result<T, ApiError>) -> Result<T, MutationError> {
        result.map_err(|e| {
            if e != ApiError::Cancelled {
                warn!("Goal request failed: {}", e);
                self.state.message = Some(format!("❌ {}", e));
            }
            MutationError::from(e)
        })
    }
}
