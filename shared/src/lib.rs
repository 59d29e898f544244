use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifiers come back from the API either as strings ("tx_1a2b3c4d") or as
/// database serials (42). Both are kept as strings on the client.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or numeric id, got {}",
            other
        ))),
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The signed-in user as held on the client.
///
/// All three identity fields are required: a session is either complete or
/// absent (`Option<Session>`), never partially populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    /// Bearer credential attached to every request when the server issues one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Session {
    pub fn from_login(response: LoginResponse) -> Self {
        Self {
            user_id: response.user.id,
            user_name: response.user.name,
            user_email: response.user.email,
            token: response.token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginUser {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: LoginUser,
    #[serde(default, alias = "access_token")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Generic `{ "message": ... }` acknowledgement returned by most mutations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// User profile. The password is never echoed back by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserProfile,
}

/// Profile update. `email` is the lookup key and is never changed;
/// `password: None` is sent as `null` and keeps the current password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub username: String,
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// Which way money moved. The client always transmits a positive amount and
/// lets the kind carry the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Apply this kind's sign to the magnitude of `amount`
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            TransactionKind::Income => amount.abs(),
            TransactionKind::Expense => -amount.abs(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// A ledger entry. Positive amounts are income, negative amounts expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub transaction_date: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        if self.amount > 0.0 {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTransactionRequest {
    pub email: String,
    /// Always the magnitude; the server reconstructs the sign from `kind`
    pub amount: f64,
    pub description: String,
    pub transaction_date: NaiveDate,
    pub kind: TransactionKind,
}

impl AddTransactionRequest {
    pub fn new(
        email: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            email: email.into(),
            amount: amount.abs(),
            description: description.into(),
            transaction_date,
            kind,
        }
    }
}

/// Income/expense totals derived from a transaction list.
///
/// Never stored on its own; recompute it from the list whenever the list
/// changes so the two cannot diverge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

impl FinancialSummary {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let (income, expenses) =
            transactions
                .into_iter()
                .fold((0.0_f64, 0.0_f64), |(income, expenses), tx| {
                    if tx.amount > 0.0 {
                        (income + tx.amount, expenses)
                    } else if tx.amount < 0.0 {
                        (income, expenses + tx.amount.abs())
                    } else {
                        (income, expenses)
                    }
                });

        Self {
            income,
            expenses,
            balance: income - expenses,
        }
    }
}

// ---------------------------------------------------------------------------
// Savings goals
// ---------------------------------------------------------------------------

/// A savings goal ("challenge" on the wire)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    pub goal_amount: f64,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub completed: bool,
}

impl SavingsGoal {
    /// A freshly created goal with nothing saved yet
    pub fn new(id: impl Into<String>, title: impl Into<String>, goal_amount: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            goal_amount,
            progress: 0.0,
            completed: false,
        }
    }

    /// The one place a progress change is computed.
    ///
    /// Negative deltas are ignored so progress never drops below zero, and
    /// `completed` only ever moves from false to true.
    pub fn apply_progress(&self, delta: f64) -> SavingsGoal {
        let progress = (self.progress + delta.max(0.0)).max(0.0);
        SavingsGoal {
            progress,
            completed: self.completed || progress >= self.goal_amount,
            ..self.clone()
        }
    }

    /// Completion percentage for display, capped at 100
    pub fn percentage(&self) -> f64 {
        if self.goal_amount <= 0.0 {
            return if self.completed { 100.0 } else { 0.0 };
        }
        ((self.progress / self.goal_amount) * 100.0).clamp(0.0, 100.0)
    }

    pub fn is_completed(&self) -> bool {
        self.completed || self.percentage() >= 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalListResponse {
    #[serde(default)]
    pub challenges: Vec<SavingsGoal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddGoalRequest {
    pub email: String,
    pub title: String,
    pub goal_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProgressRequest {
    pub challenge_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotivationResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Optimistic entity tracking
// ---------------------------------------------------------------------------

/// Whether a locally held entity has been seen in an authoritative server read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Created locally; the id is a client placeholder the server does not know
    Pending { placeholder: Uuid },
    /// Read back from the server; the id is the server's
    Confirmed,
}

/// An entity plus its sync state
#[derive(Debug, Clone, PartialEq)]
pub struct Tracked<T> {
    pub item: T,
    pub sync: SyncState,
}

impl<T> Tracked<T> {
    pub fn confirmed(item: T) -> Self {
        Self {
            item,
            sync: SyncState::Confirmed,
        }
    }

    pub fn pending(item: T, placeholder: Uuid) -> Self {
        Self {
            item,
            sync: SyncState::Pending { placeholder },
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.sync, SyncState::Pending { .. })
    }
}

/// Money compared the way the server stores it, in whole cents
fn cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Entities the server assigns ids to
pub trait ServerEntity {
    fn id(&self) -> &str;

    /// Whether `self`, read from the server, is the record a pending local
    /// entry was created as
    fn fulfils(&self, pending: &Self) -> bool;
}

impl ServerEntity for SavingsGoal {
    fn id(&self) -> &str {
        &self.id
    }

    fn fulfils(&self, pending: &Self) -> bool {
        self.title == pending.title && cents(self.goal_amount) == cents(pending.goal_amount)
    }
}

impl ServerEntity for Transaction {
    fn id(&self) -> &str {
        &self.id
    }

    fn fulfils(&self, pending: &Self) -> bool {
        self.description == pending.description
            && cents(self.amount) == cents(pending.amount)
            && self.transaction_date == pending.transaction_date
    }
}

/// Result of merging an authoritative read into local state
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled<T> {
    /// The server list, in server order
    pub confirmed: Vec<Tracked<T>>,
    /// Local creations the server list does not show yet
    pub still_pending: Vec<Tracked<T>>,
}

/// Replace local state with the server's list.
///
/// Each pending entry is matched against at most one server record that was
/// not already known locally; matched entries are dropped in favour of the
/// server copy (and its real id), unmatched ones stay pending.
pub fn reconcile<T: ServerEntity + Clone>(local: Vec<Tracked<T>>, server: Vec<T>) -> Reconciled<T> {
    let known: std::collections::HashSet<String> = local
        .iter()
        .filter(|entry| !entry.is_pending())
        .map(|entry| entry.item.id().to_string())
        .collect();

    let mut unclaimed: Vec<usize> = server
        .iter()
        .enumerate()
        .filter(|(_, item)| !known.contains(item.id()))
        .map(|(index, _)| index)
        .collect();

    let still_pending: Vec<Tracked<T>> = local
        .into_iter()
        .filter(|entry| entry.is_pending())
        .filter(|entry| {
            match unclaimed
                .iter()
                .position(|&index| server[index].fulfils(&entry.item))
            {
                Some(position) => {
                    unclaimed.remove(position);
                    false
                }
                None => true,
            }
        })
        .collect();

    Reconciled {
        confirmed: server.into_iter().map(Tracked::confirmed).collect(),
        still_pending,
    }
}

// ---------------------------------------------------------------------------
// Credit
// ---------------------------------------------------------------------------

/// Latest credit score. Read-only, externally sourced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditSnapshot {
    pub score: u32,
    #[serde(default)]
    pub provider: Option<String>,
    pub date: NaiveDate,
}

/// A tip or insight card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTip {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// The tips endpoint answers either with a wrapped personalized list or a
/// bare array of general tips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreditTipsResponse {
    Personalized { personalized_tips: Vec<CreditTip> },
    General(Vec<CreditTip>),
}

impl CreditTipsResponse {
    pub fn into_tips(self) -> Vec<CreditTip> {
        match self {
            CreditTipsResponse::Personalized { personalized_tips } => personalized_tips,
            CreditTipsResponse::General(tips) => tips,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditInsightsResponse {
    #[serde(default)]
    pub insights: Vec<CreditTip>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTip {
    pub title: String,
    #[serde(default)]
    pub advice: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditAnalysis {
    #[serde(default)]
    pub tips: Vec<AnalysisTip>,
}

/// AI credit analysis report. The server reports failures in-band via `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditAnalysisResponse {
    #[serde(default)]
    pub analysis: Option<CreditAnalysis>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    User,
    #[serde(alias = "ai")]
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: ChatSender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: ChatSender::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: ChatSender::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Form validation
// ---------------------------------------------------------------------------

/// Input problems caught before any request is sent
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill all fields.")]
    MissingFields,
    #[error("Amount must be a number.")]
    InvalidAmount(String),
    #[error("Amount must be greater than 0.")]
    AmountNotPositive,
    #[error("Unknown transaction type '{0}', expected income or expense.")]
    UnknownKind(String),
    #[error("⚠️ Passwords do not match!")]
    PasswordMismatch,
}

/// Parse a money amount typed by the user.
///
/// Dollar signs, thousands separators and spaces are stripped first;
/// non-finite values are rejected.
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let cleaned = input.trim().replace(['$', ',', ' '], "");
    if cleaned.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::InvalidAmount(input.to_string())),
    }
}

/// Parse an amount that must be strictly positive (goal targets, progress deltas)
pub fn parse_positive_amount(input: &str) -> Result<f64, ValidationError> {
    let value = parse_amount(input)?;
    if value <= 0.0 {
        return Err(ValidationError::AmountNotPositive);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, amount: f64) -> Transaction {
        Transaction {
            id: id.to_string(),
            description: format!("tx {}", id),
            amount,
            transaction_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            category: None,
        }
    }

    #[test]
    fn test_summary_splits_income_and_expenses() {
        let txs = vec![tx("1", 1200.0), tx("2", -45.5), tx("3", -300.0), tx("4", 80.0)];

        let summary = FinancialSummary::from_transactions(&txs);

        assert_eq!(summary.income, 1280.0);
        assert_eq!(summary.expenses, 345.5);
        assert_eq!(summary.balance, 934.5);
    }

    #[test]
    fn test_summary_invariants_hold_for_mixed_lists() {
        let lists = vec![
            vec![],
            vec![tx("a", -10.0)],
            vec![tx("a", 0.0), tx("b", 0.01)],
            vec![tx("a", -500.0), tx("b", 20.0), tx("c", -0.25)],
        ];

        for txs in lists {
            let summary = FinancialSummary::from_transactions(&txs);
            assert!(summary.income >= 0.0);
            assert!(summary.expenses >= 0.0);
            assert_eq!(summary.balance, summary.income - summary.expenses);
        }
    }

    #[test]
    fn test_goal_progress_accumulates_and_caps_percentage() {
        let goal = SavingsGoal::new("7", "Emergency fund", 100.0);

        let goal = goal.apply_progress(40.0);
        assert_eq!(goal.progress, 40.0);
        assert!(!goal.completed);

        let goal = goal.apply_progress(70.0);
        assert_eq!(goal.progress, 110.0);
        assert!(goal.completed);
        assert_eq!(goal.percentage(), 100.0);
    }

    #[test]
    fn test_goal_completion_is_monotonic() {
        let goal = SavingsGoal {
            id: "1".to_string(),
            title: "Bike".to_string(),
            goal_amount: 50.0,
            progress: 10.0,
            completed: true,
        };

        let updated = goal.apply_progress(-25.0);

        assert!(updated.completed);
        assert_eq!(updated.progress, 10.0);
    }

    #[test]
    fn test_percentage_with_zero_goal_does_not_divide_by_zero() {
        let goal = SavingsGoal::new("1", "Nothing", 0.0);
        assert_eq!(goal.percentage(), 0.0);
    }

    #[test]
    fn test_add_transaction_request_sends_magnitude() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let request =
            AddTransactionRequest::new("a@b.com", "Groceries", -50.0, TransactionKind::Expense, date);

        assert_eq!(request.amount, 50.0);
        assert_eq!(request.kind, TransactionKind::Expense);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "expense");
        assert_eq!(json["transaction_date"], "2025-01-02");
        assert_eq!(TransactionKind::Expense.signed(request.amount), -50.0);
    }

    #[test]
    fn test_ids_decode_from_strings_and_numbers() {
        let goals: GoalListResponse = serde_json::from_str(
            r#"{"challenges":[
                {"id":12,"title":"Trip","goal_amount":500.0,"progress":20.0,"completed":false,"user_email":"a@b.com"},
                {"id":"ch_9","title":"Laptop","goal_amount":900.0}
            ]}"#,
        )
        .unwrap();

        assert_eq!(goals.challenges[0].id, "12");
        assert_eq!(goals.challenges[1].id, "ch_9");
        assert_eq!(goals.challenges[1].progress, 0.0);
    }

    #[test]
    fn test_tips_decode_wrapped_and_bare() {
        let wrapped: CreditTipsResponse = serde_json::from_str(
            r#"{"personalized_tips":[{"title":"Pay on Time","content":"Always."}]}"#,
        )
        .unwrap();
        let bare: CreditTipsResponse =
            serde_json::from_str(r#"[{"title":"Track Spending","content":"Budget.","category":"Budgeting"}]"#)
                .unwrap();

        assert_eq!(wrapped.into_tips()[0].title, "Pay on Time");
        assert_eq!(bare.into_tips()[0].category.as_deref(), Some("Budgeting"));
    }

    #[test]
    fn test_update_user_request_serializes_null_password() {
        let request = UpdateUserRequest {
            email: "a@b.com".to_string(),
            username: "alice".to_string(),
            password: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json["password"].is_null());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" $1,250.50 "), Ok(1250.5));
        assert_eq!(parse_amount("-50"), Ok(-50.0));
        assert_eq!(parse_amount(""), Err(ValidationError::MissingFields));
        assert!(matches!(parse_amount("abc"), Err(ValidationError::InvalidAmount(_))));
        assert!(matches!(parse_amount("inf"), Err(ValidationError::InvalidAmount(_))));
        assert_eq!(parse_positive_amount("0"), Err(ValidationError::AmountNotPositive));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!(" expense ".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("refund".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_reconcile_confirms_pending_goal_with_server_id() {
        let local = vec![
            Tracked::confirmed(SavingsGoal::new("1", "Trip", 500.0)),
            Tracked::pending(SavingsGoal::new("tmp", "Laptop", 900.0), Uuid::new_v4()),
            Tracked::pending(SavingsGoal::new("tmp2", "Bike", 300.0), Uuid::new_v4()),
        ];
        let server = vec![
            SavingsGoal::new("1", "Trip", 500.0).apply_progress(50.0),
            SavingsGoal::new("2", "Laptop", 900.0),
        ];

        let merged = reconcile(local, server);

        let ids: Vec<&str> = merged.confirmed.iter().map(|e| e.item.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(merged.confirmed[0].item.progress, 50.0);
        assert_eq!(merged.still_pending.len(), 1);
        assert_eq!(merged.still_pending[0].item.title, "Bike");
    }

    #[test]
    fn test_reconcile_does_not_claim_already_known_records() {
        // "Trip" #1 was already confirmed, so it cannot be the pending "Trip"
        let local = vec![
            Tracked::confirmed(SavingsGoal::new("1", "Trip", 500.0)),
            Tracked::pending(SavingsGoal::new("tmp", "Trip", 500.0), Uuid::new_v4()),
        ];
        let server = vec![SavingsGoal::new("1", "Trip", 500.0)];

        let merged = reconcile(local, server);

        assert_eq!(merged.confirmed.len(), 1);
        assert_eq!(merged.still_pending.len(), 1);
    }

    #[test]
    fn test_reconcile_matches_amounts_to_the_cent() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let typed = Transaction {
            id: "tmp".to_string(),
            description: "Books".to_string(),
            amount: -19.999,
            transaction_date: date,
            category: None,
        };
        let stored = Transaction {
            id: "41".to_string(),
            amount: -20.0,
            ..typed.clone()
        };

        let merged = reconcile(vec![Tracked::pending(typed, Uuid::new_v4())], vec![stored]);

        assert_eq!(merged.confirmed.len(), 1);
        assert!(merged.still_pending.is_empty());
        assert_eq!(FinancialSummary::from_transactions(merged.confirmed.iter().map(|e| &e.item)).expenses, 20.0);
    }

    #[test]
    fn test_session_round_trips_without_token() {
        let session = Session {
            user_id: "usr_1".to_string(),
            user_name: "alice".to_string(),
            user_email: "alice@example.com".to_string(),
            token: None,
        };

        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("token"));
        assert_eq!(serde_json::from_str::<Session>(&json).unwrap(), session);
    }
}
