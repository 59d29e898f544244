//! AI credit assistant: a chat transcript plus the generated analysis report.

use shared::{ChatMessage, ChatRequest, CreditAnalysis};
use tracing::{debug, info, warn};

use super::PageContext;
use crate::components::{chat_transcript, navbar};
use crate::router::{Redirect, Route};
use crate::services::api::{ApiClient, ApiError};
use crate::session::SessionStore;

pub const GREETING: &str = "Hi there! I'm your credit assistant. Ask me anything about your credit health 💬";
pub const MISSING_REPLY: &str = "Hmm, something went wrong.";
pub const CHAT_FAILED: &str = "Error contacting AI server.";
pub const REPORT_UNAVAILABLE: &str = "⚠️ Unable to generate your credit analysis right now.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatStatus {
    #[default]
    Idle,
    Sending,
}

#[derive(Debug, Clone)]
pub struct CreditAnalysisState {
    pub messages: Vec<ChatMessage>,
    pub status: ChatStatus,
    pub report: Option<CreditAnalysis>,
    pub report_message: Option<String>,
}

impl Default for CreditAnalysisState {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            status: ChatStatus::Idle,
            report: None,
            report_message: None,
        }
    }
}

pub struct CreditAnalysisPage {
    ctx: PageContext,
    pub state: CreditAnalysisState,
}

impl CreditAnalysisPage {
    /// Enter the page. The report is not fetched until asked for.
    pub fn open(api: &ApiClient, store: &dyn SessionStore) -> Result<Self, Redirect> {
        let ctx = PageContext::enter(Route::CreditAnalysis, api, store)?;
        Ok(Self::new(ctx))
    }

    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            state: CreditAnalysisState::default(),
        }
    }

    /// Send one chat message and append exactly one assistant answer.
    ///
    /// Blank input is ignored and returns `None`.
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.state.messages.push(ChatMessage::user(text));
        self.state.status = ChatStatus::Sending;

        let request = ChatRequest {
            message: text.to_string(),
            email: Some(self.ctx.email().to_string()),
        };
        let result = self.ctx.lifetime.run(self.ctx.api.chat(&request)).await;

        let reply = match result {
            Ok(response) => match response.reply.filter(|reply| !reply.trim().is_empty()) {
                Some(reply) => reply,
                None => {
                    warn!("Chat answered without a reply: {:?}", response.error);
                    MISSING_REPLY.to_string()
                }
            },
            Err(ApiError::Cancelled) => {
                debug!("Analysis page left while waiting for a reply");
                self.state.status = ChatStatus::Idle;
                return None;
            }
            Err(e) => {
                warn!("Chat request failed: {}", e);
                CHAT_FAILED.to_string()
            }
        };

        self.state.messages.push(ChatMessage::assistant(reply));
        self.state.status = ChatStatus::Idle;
        self.state.messages.last()
    }

    pub async fn load_report(&mut self) {
        let result = self
            .ctx
            .lifetime
            .run(self.ctx.api.get_credit_analysis(self.ctx.email()))
            .await;

        match result {
            Ok(response) => match (response.analysis, response.error) {
                (Some(analysis), None) => {
                    info!("Credit analysis loaded with {} tips", analysis.tips.len());
                    self.state.report = Some(analysis);
                    self.state.report_message = None;
                }
                (_, error) => {
                    warn!("Credit analysis unavailable: {:?}", error);
                    self.state.report = None;
                    self.state.report_message =
                        Some(error.map(|e| format!("❌ {}", e)).unwrap_or_else(|| REPORT_UNAVAILABLE.to_string()));
                }
            },
            Err(ApiError::Cancelled) => debug!("Analysis page left during report load"),
            Err(e) => {
                warn!("Failed to load credit analysis: {}", e);
                self.state.report = None;
                self.state.report_message = Some(REPORT_UNAVAILABLE.to_string());
            }
        }
    }

    pub fn leave(&self) {
        self.ctx.leave();
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![navbar::render(Route::CreditAnalysis), String::new()];

        if let Some(report) = &self.state.report {
            lines.push("Your Credit Analysis".to_string());
            for tip in &report.tips {
                lines.push(format!("  • {}", tip.title));
                lines.push(format!("    {}", tip.advice));
            }
            lines.push(String::new());
        }
        if let Some(message) = &self.state.report_message {
            lines.push(message.clone());
            lines.push(String::new());
        }

        lines.extend(chat_transcript::render(&self.state.messages));
        if self.state.status == ChatStatus::Sending {
            lines.push("CrediWise AI is typing...".to_string());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::fixtures;
    use crate::services::test_server::FakeApi;
    use serde_json::json;
    use shared::ChatSender;

    #[tokio::test]
    async fn test_exchange_appends_in_order() {
        let fake = FakeApi::start().await;
        fake.respond("POST", "/ai/chat", 200, json!({"reply": "Pay your card in full each month."}));
        let mut page = CreditAnalysisPage::new(fixtures::context(&fake));

        let reply = page.send("How do I raise my score?").await.cloned();

        assert_eq!(reply, Some(ChatMessage::assistant("Pay your card in full each month.")));
        let senders: Vec<ChatSender> = page.state.messages.iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![ChatSender::Assistant, ChatSender::User, ChatSender::Assistant]);
        assert_eq!(page.state.messages[1].text, "How do I raise my score?");
        assert_eq!(page.state.status, ChatStatus::Idle);
        assert_eq!(
            fake.requests_to("POST", "/ai/chat")[0].body,
            json!({"message": "How do I raise my score?", "email": fixtures::EMAIL})
        );
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let fake = FakeApi::start().await;
        let mut page = CreditAnalysisPage::new(fixtures::context(&fake));

        assert!(page.send("   ").await.is_none());

        assert_eq!(page.state.messages.len(), 1);
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_reply_and_failure_messages() {
        let fake = FakeApi::start().await;
        fake.respond("POST", "/ai/chat", 200, json!({"error": "model overloaded"}));
        let mut page = CreditAnalysisPage::new(fixtures::context(&fake));

        assert_eq!(page.send("hello").await.unwrap().text, MISSING_REPLY);

        fake.respond("POST", "/ai/chat", 502, json!({"detail": "bad gateway"}));
        assert_eq!(page.send("again").await.unwrap().text, CHAT_FAILED);
        assert_eq!(page.state.messages.len(), 5);
    }

    #[tokio::test]
    async fn test_report_error_is_surfaced() {
        let fake = FakeApi::start().await;
        fake.respond(
            "GET",
            "/ai/credit_analysis/alice@example.com",
            200,
            json!({"error": "No credit data found"}),
        );
        let mut page = CreditAnalysisPage::new(fixtures::context(&fake));

        page.load_report().await;

        assert!(page.state.report.is_none());
        assert_eq!(page.state.report_message.as_deref(), Some("❌ No credit data found"));
    }

    #[tokio::test]
    async fn test_report_renders_tips() {
        let fake = FakeApi::start().await;
        fake.respond(
            "GET",
            "/ai/credit_analysis/alice@example.com",
            200,
            json!({"analysis": {"tips": [{"title": "Lower utilisation", "advice": "Aim for under 30%."}]}}),
        );
        let mut page = CreditAnalysisPage::new(fixtures::context(&fake));

        page.load_report().await;

        let lines = page.render();
        assert!(lines.contains(&"  • Lower utilisation".to_string()));
        assert!(lines.contains(&format!("CrediWise AI: {}", GREETING)));
    }
}
