use shared::SavingsGoal;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Width of the bar in cells when callers don't care
pub const DEFAULT_WIDTH: usize = 20;

/// Render a fixed-width bar for `percentage` (clamped to 0..=100)
pub fn render_percentage(percentage: f64, width: usize) -> String {
    let pct = if percentage.is_finite() {
        percentage.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((pct / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);

    let mut bar = String::with_capacity(width + 8);
    bar.push('[');
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(width - filled));
    bar.push(']');
    bar.push_str(&format!(" {:>3.0}%", pct));
    bar
}

pub fn render(goal: &SavingsGoal, width: usize) -> String {
    render_percentage(goal.percentage(), width)
}
