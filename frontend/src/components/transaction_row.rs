use shared::{Tracked, Transaction};

use super::format_signed_money;
use crate::services::date_utils::format_display_date;

pub fn render(tx: &Transaction) -> String {
    let description = if tx.description.trim().is_empty() {
        "Transaction"
    } else {
        tx.description.as_str()
    };

    format!(
        "{:<28} {:>12}  {:<18} {}",
        description,
        format_signed_money(tx.amount),
        format_display_date(tx.transaction_date),
        tx.category.as_deref().unwrap_or("Other"),
    )
}

/// Ledger row, with a marker for entries the server has not confirmed yet
pub fn render_tracked(entry: &Tracked<Transaction>) -> String {
    if entry.is_pending() {
        format!("{} (saving…)", render(&entry.item))
    } else {
        render(&entry.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_expense_row() {
        let tx = Transaction {
            id: "tx_1".to_string(),
            description: "Groceries".to_string(),
            amount: -50.0,
            transaction_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            category: None,
        };

        let row = render(&tx);

        assert!(row.starts_with("Groceries"));
        assert!(row.contains("-$50.00"));
        assert!(row.contains("June 1, 2025"));
        assert!(row.ends_with("Other"));
    }
}
