//! Stateless text renderers. Each takes already-computed view data and
//! returns the lines to print; none of them fetch or mutate anything.

pub mod chat_transcript;
pub mod goal_card;
pub mod navbar;
pub mod progress_bar;
pub mod stat_card;
pub mod transaction_row;

/// `1234.5` -> `"1234.50"`
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Signed money for ledgers: `+$50.00` for income, `-$50.00` for expenses
pub fn format_signed_money(amount: f64) -> String {
    let sign = if amount > 0.0 { "+" } else { "-" };
    format!("{}${}", sign, format_amount(amount.abs()))
}
