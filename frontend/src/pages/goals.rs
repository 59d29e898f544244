use shared::{reconcile, SavingsGoal, Tracked};
use tracing::debug;
use uuid::Uuid;

/// Locally held savings goals, confirmed and pending
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalBoard {
    goals: Vec<Tracked<SavingsGoal>>,
}

impl GoalBoard {
    pub fn from_server(goals: Vec<SavingsGoal>) -> Self {
        Self {
            goals: goals.into_iter().map(Tracked::confirmed).collect(),
        }
    }

    pub fn goals(&self) -> &[Tracked<SavingsGoal>] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn find(&self, goal_id: &str) -> Option<&Tracked<SavingsGoal>> {
        self.goals.iter().find(|entry| entry.item.id == goal_id)
    }

    /// Append a goal the server accepted but has not returned an id for
    pub fn push_pending(&mut self, title: &str, goal_amount: f64) -> Uuid {
        let placeholder = Uuid::new_v4();
        let goal = SavingsGoal::new(placeholder.to_string(), title, goal_amount);
        self.goals.push(Tracked::pending(goal, placeholder));
        placeholder
    }

    /// Patch a confirmed goal after the server accepted a progress update
    pub fn apply_progress(&mut self, goal_id: &str, delta: f64) -> Option<SavingsGoal> {
        let entry = self.goals.iter_mut().find(|entry| entry.item.id == goal_id)?;
        entry.item = entry.item.apply_progress(delta);
        Some(entry.item.clone())
    }

    pub fn remove(&mut self, goal_id: &str) -> Option<SavingsGoal> {
        let index = self.goals.iter().position(|entry| entry.item.id == goal_id)?;
        Some(self.goals.remove(index).item)
    }

    /// Adopt an authoritative list; pending goals it does not show yet stay at the end
    pub fn reconcile(&mut self, server: Vec<SavingsGoal>) {
        let local = std::mem::take(&mut self.goals);
        let merged = reconcile(local, server);
        debug!(
            "Reconciled goals: {} confirmed, {} still pending",
            merged.confirmed.len(),
            merged.still_pending.len()
        );
        self.goals = merged.confirmed;
        self.goals.extend(merged.still_pending);
    }
}
