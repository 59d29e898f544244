use shared::{SavingsGoal, Tracked};

use super::{format_amount, progress_bar};

/// Multi-line card for one savings goal
pub fn render(entry: &Tracked<SavingsGoal>) -> Vec<String> {
    let goal = &entry.item;
    let status = if goal.is_completed() {
        "🎉 Completed"
    } else {
        "🔥 Keep going"
    };
    let header = if entry.is_pending() {
        format!("💰 {} (saving…)", goal.title)
    } else {
        format!("💰 {}  #{}", goal.title, goal.id)
    };

    vec![
        header,
        format!("   Target: ${}", format_amount(goal.goal_amount)),
        format!("   {}", progress_bar::render(goal, progress_bar::DEFAULT_WIDTH)),
        format!(
            "   Progress: ${} / ${}  {}",
            format_amount(goal.progress),
            format_amount(goal.goal_amount),
            status
        ),
    ]
}
