use shared::{
    parse_amount, reconcile, AddTransactionRequest, FinancialSummary, Tracked, Transaction, TransactionKind,
    ValidationError,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{FormStatus, MutationError, PageContext};
use crate::components::{navbar, stat_card, transaction_row};
use crate::router::{Redirect, Route};
use crate::services::api::{ApiClient, ApiError};
use crate::services::date_utils::today;
use crate::session::SessionStore;

pub const LOAD_WARNING: &str = "⚠️ Unable to load transactions.";
pub const ADDED_MESSAGE: &str = "✅ Transaction added!";

#[derive(Debug, Clone, Default)]
pub struct TransactionsState {
    /// Newest first, as the server orders them
    pub transactions: Vec<Tracked<Transaction>>,
    pub loading: bool,
    pub status: FormStatus,
    pub message: Option<String>,
}

impl TransactionsState {
    pub fn summary(&self) -> FinancialSummary {
        FinancialSummary::from_transactions(self.transactions.iter().map(|entry| &entry.item))
    }
}

pub struct TransactionsPage {
    ctx: PageContext,
    pub state: TransactionsState,
}

impl TransactionsPage {
    pub async fn open(api: &ApiClient, store: &dyn SessionStore) -> Result<Self, Redirect> {
        let ctx = PageContext::enter(Route::Transactions, api, store)?;
        let mut page = Self::new(ctx);
        page.load().await;
        Ok(page)
    }

    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            state: TransactionsState::default(),
        }
    }

    pub async fn load(&mut self) {
        self.state.loading = true;
        let result = self
            .ctx
            .lifetime
            .run(self.ctx.api.get_transactions(self.ctx.email()))
            .await;

        match result {
            Ok(server) => {
                let local = std::mem::take(&mut self.state.transactions);
                let merged = reconcile(local, server);
                self.state.transactions = merged.still_pending;
                self.state.transactions.extend(merged.confirmed);
                self.state.message = None;
                info!("Loaded {} transactions", self.state.transactions.len());
            }
            Err(ApiError::Cancelled) => {
                debug!("Transactions page left during load");
                return;
            }
            Err(e) => {
                warn!("Failed to load transactions: {}", e);
                self.state.transactions.clear();
                self.state.message = Some(LOAD_WARNING.to_string());
            }
        }
        self.state.loading = false;
    }

    /// Record an income or expense dated today.
    ///
    /// The amount may be typed with either sign; its magnitude is sent and
    /// `kind` decides the sign of the local entry.
    pub async fn add_transaction(
        &mut self,
        description: &str,
        amount_input: &str,
        kind: TransactionKind,
    ) -> Result<(), MutationError> {
        let description = description.trim();
        let validated = if description.is_empty() || amount_input.trim().is_empty() {
            Err(ValidationError::MissingFields)
        } else {
            parse_amount(amount_input)
        };
        let amount = match validated {
            Ok(amount) => amount,
            Err(e) => {
                self.state.message = Some(e.to_string());
                return Err(e.into());
            }
        };

        let request = AddTransactionRequest::new(self.ctx.email(), description, amount, kind, today());
        self.state.status = FormStatus::Submitting;
        self.state.message = Some("Adding transaction...".to_string());

        let result = self.ctx.lifetime.run(self.ctx.api.add_transaction(&request)).await;
        if let Err(e) = result {
            self.state.status = FormStatus::Idle;
            if e != ApiError::Cancelled {
                warn!("Failed to add transaction: {}", e);
                self.state.message = Some(format!("❌ {}", e));
            }
            return Err(e.into());
        }

        let placeholder = Uuid::new_v4();
        let entry = Transaction {
            id: placeholder.to_string(),
            description: request.description,
            amount: kind.signed(request.amount),
            transaction_date: request.transaction_date,
            category: None,
        };
        info!("💸 Added {} '{}' of {:.2}", kind, entry.description, request.amount);
        self.state.transactions.insert(0, Tracked::pending(entry, placeholder));
        self.state.status = FormStatus::Succeeded;
        self.state.message = Some(ADDED_MESSAGE.to_string());
        Ok(())
    }

    pub fn leave(&self) {
        self.ctx.leave();
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![navbar::render(Route::Transactions), String::new()];
        if let Some(message) = &self.state.message {
            lines.push(message.clone());
        }
        lines.extend(stat_card::summary_cards(&self.state.summary()).iter().map(|card| card.render()));
        lines.push(String::new());

        if self.state.transactions.is_empty() {
            lines.push("No transactions yet.".to_string());
        } else {
            lines.extend(self.state.transactions.iter().map(transaction_row::render_tracked));
        }
        lines
    }
}
