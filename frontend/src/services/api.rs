//! API gateway client.
//!
//! Every page talks to the server through [`ApiClient`]. Outcomes are
//! normalized into `Result<_, ApiError>`: 2xx carries the parsed JSON body,
//! non-2xx carries the server's message, and a request that never got a
//! response is [`ApiError::Unreachable`] or [`ApiError::Timeout`]. Nothing is
//! retried.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::{
    AddGoalRequest, AddTransactionRequest, ChatRequest, ChatResponse, CreditAnalysisResponse,
    CreditInsightsResponse, CreditSnapshot, CreditTip, CreditTipsResponse, GoalListResponse,
    LoginRequest, LoginResponse, MessageResponse, MotivationResponse, SavingsGoal, Session,
    SignupRequest, Transaction, TransactionListResponse, UpdateProgressRequest, UpdateUserRequest,
    UserProfile, UserResponse,
};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ClientConfig;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    #[error("{message}")]
    Server { status: u16, message: String },
    /// No response: refused connection, DNS failure, dropped socket
    #[error("Unable to connect to server")]
    Unreachable(String),
    #[error("The server took too long to respond")]
    Timeout,
    /// The page that issued the request went away first
    #[error("Request cancelled")]
    Cancelled,
    /// 2xx with a body that is not the expected JSON shape
    #[error("Unexpected response from server: {0}")]
    Decode(String),
    #[error("Failed to set up HTTP client: {0}")]
    Client(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Display text, or `fallback` when the server rejected the request
    /// without saying why
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Server { status, message } if *message == status_fallback(*status) => fallback.to_string(),
            other => other.to_string(),
        }
    }

    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Unreachable(error.to_string())
        }
    }
}

/// Pull a human-readable message out of an error payload.
///
/// Looks at `detail` (string, or the first entry's `msg` of a validation
/// list), then `message`, then `error`.
fn server_message(status: StatusCode, body: &Value) -> String {
    let detail = match body.get("detail") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Array(items)) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };

    detail
        .or_else(|| body.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| body.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| status_fallback(status.as_u16()))
}

fn status_fallback(status: u16) -> String {
    format!("Request failed with status {}", status)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Acknowledgement bodies are optional; an empty or odd-shaped 2xx still counts
fn decode_ack(value: Value) -> MessageResponse {
    serde_json::from_value(value).unwrap_or_default()
}

/// API client for communicating with the CrediWise server
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::build(config.api_base_url.clone(), config.request_timeout())
    }

    /// Create a client against a custom base URL with the given timeout
    pub fn build(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// A copy of this client that sends the session's bearer token
    pub fn authorized(&self, session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Issue one request and classify the outcome
    pub async fn request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut builder = self.http.request(method.clone(), &url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed without a response: {}", method, url, e);
            ApiError::from_transport(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        let parsed = if bytes.is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_slice::<Value>(&bytes)
        };

        if status.is_success() {
            return parsed.map_err(|e| ApiError::Decode(e.to_string()));
        }

        let body = parsed.unwrap_or(Value::Null);
        let message = server_message(status, &body);
        warn!("{} {} rejected with {}: {}", method, url, status, message);
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request::<()>(Method::GET, path, None).await
    }

    async fn send<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<Value, ApiError> {
        self.request(method, path, Some(body)).await
    }

    /// Test connection to the backend
    pub async fn ping(&self) -> Result<MessageResponse, ApiError> {
        self.get("/").await.map(decode_ack)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        decode(self.send(Method::POST, "/login", request).await?)
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<MessageResponse, ApiError> {
        self.send(Method::POST, "/signup", request).await.map(decode_ack)
    }

    pub async fn get_user(&self, email: &str) -> Result<UserProfile, ApiError> {
        let response: UserResponse =
            decode(self.get(&format!("/user/{}", urlencoding::encode(email))).await?)?;
        Ok(response.user)
    }

    pub async fn update_user(&self, request: &UpdateUserRequest) -> Result<MessageResponse, ApiError> {
        self.send(Method::PUT, "/update_user", request).await.map(decode_ack)
    }

    /// Transactions in server order (newest first)
    pub async fn get_transactions(&self, email: &str) -> Result<Vec<Transaction>, ApiError> {
        let response: TransactionListResponse =
            decode(self.get(&format!("/transactions/{}", urlencoding::encode(email))).await?)?;
        Ok(response.transactions)
    }

    pub async fn add_transaction(&self, request: &AddTransactionRequest) -> Result<MessageResponse, ApiError> {
        self.send(Method::POST, "/transactions/add", request).await.map(decode_ack)
    }

    pub async fn get_goals(&self, email: &str) -> Result<Vec<SavingsGoal>, ApiError> {
        let response: GoalListResponse =
            decode(self.get(&format!("/challenges/{}", urlencoding::encode(email))).await?)?;
        Ok(response.challenges)
    }

    pub async fn add_goal(&self, request: &AddGoalRequest) -> Result<MessageResponse, ApiError> {
        self.send(Method::POST, "/challenges/add", request).await.map(decode_ack)
    }

    pub async fn update_goal_progress(&self, request: &UpdateProgressRequest) -> Result<MessageResponse, ApiError> {
        self.send(Method::PUT, "/challenges/update_progress", request)
            .await
            .map(decode_ack)
    }

    pub async fn delete_goal(&self, goal_id: &str) -> Result<MessageResponse, ApiError> {
        self.request::<()>(
            Method::DELETE,
            &format!("/challenges/delete/{}", urlencoding::encode(goal_id)),
            None,
        )
        .await
        .map(decode_ack)
    }

    /// Motivational line for the goals section; `None` when the server has none
    pub async fn get_motivation(&self, email: &str) -> Result<Option<String>, ApiError> {
        let response: MotivationResponse =
            decode(self.get(&format!("/challenges/motivate/{}", urlencoding::encode(email))).await?)?;
        Ok(response.message.filter(|m| !m.trim().is_empty()))
    }

    pub async fn get_credit_score(&self, email: &str) -> Result<CreditSnapshot, ApiError> {
        decode(self.get(&format!("/credit/{}", urlencoding::encode(email))).await?)
    }

    pub async fn get_credit_tips(&self, email: &str) -> Result<Vec<CreditTip>, ApiError> {
        let response: CreditTipsResponse =
            decode(self.get(&format!("/credit/tips/{}", urlencoding::encode(email))).await?)?;
        Ok(response.into_tips())
    }

    pub async fn get_credit_insights(&self, email: &str) -> Result<Vec<CreditTip>, ApiError> {
        let response: CreditInsightsResponse =
            decode(self.get(&format!("/credit/insights/{}", urlencoding::encode(email))).await?)?;
        Ok(response.insights)
    }

    pub async fn get_credit_analysis(&self, email: &str) -> Result<CreditAnalysisResponse, ApiError> {
        decode(self.get(&format!("/ai/credit_analysis/{}", urlencoding::encode(email))).await?)
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        decode(self.send(Method::POST, "/ai/chat", request).await?)
    }
}
