use shared::FinancialSummary;

use super::format_amount;

/// One summary figure, e.g. "Total Income  +$1200.00"
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    pub prefix: &'static str,
    pub value: f64,
}

impl StatCard {
    pub fn render(&self) -> String {
        format!("{:<16}{}{}", self.label, self.prefix, format_amount(self.value))
    }
}

/// The three dashboard cards, balance first
pub fn summary_cards(summary: &FinancialSummary) -> [StatCard; 3] {
    [
        StatCard {
            label: "Total Balance",
            prefix: "$",
            value: summary.balance,
        },
        StatCard {
            label: "Total Income",
            prefix: "+$",
            value: summary.income,
        },
        StatCard {
            label: "Total Expenses",
            prefix: "-$",
            value: summary.expenses,
        },
    ]
}
