use shared::{CreditSnapshot, CreditTip};
use tracing::{debug, info};

use super::{degrade, PageContext};
use crate::components::navbar;
use crate::router::{Redirect, Route};
use crate::services::api::ApiClient;
use crate::services::date_utils::format_display_date;
use crate::session::SessionStore;

pub const NO_SCORE: &str = "⚠️ No credit score data available yet.";
pub const NO_TIPS: &str = "No tips available right now.";
const BANNER: &str = "💡 Keep your utilisation below 30% and pay on time. Consistency builds credit confidence!";

#[derive(Debug, Clone, Default)]
pub struct CreditEducationState {
    pub score: Option<CreditSnapshot>,
    pub tips: Vec<CreditTip>,
    pub insights: Vec<CreditTip>,
    pub loading: bool,
}

pub struct CreditEducationPage {
    ctx: PageContext,
    pub state: CreditEducationState,
}

impl CreditEducationPage {
    pub async fn open(api: &ApiClient, store: &dyn SessionStore) -> Result<Self, Redirect> {
        let ctx = PageContext::enter(Route::CreditEducation, api, store)?;
        let mut page = Self::new(ctx);
        page.load().await;
        Ok(page)
    }

    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            state: CreditEducationState::default(),
        }
    }

    /// Score, tips and insights are independent; whatever arrives is shown
    pub async fn load(&mut self) {
        self.state.loading = true;
        let email = self.ctx.email();
        let (api, lifetime) = (&self.ctx.api, &self.ctx.lifetime);

        let (score, tips, insights) = tokio::join!(
            lifetime.run(api.get_credit_score(email)),
            lifetime.run(api.get_credit_tips(email)),
            lifetime.run(api.get_credit_insights(email)),
        );

        if lifetime.is_cancelled() {
            debug!("Credit education left during load, discarding results");
            return;
        }

        self.state.score = degrade("Credit education", "score", score);
        self.state.tips = degrade("Credit education", "tips", tips).unwrap_or_default();
        self.state.insights = degrade("Credit education", "insights", insights).unwrap_or_default();
        self.state.loading = false;
        info!(
            "Credit education loaded: score {}, {} tips, {} insights",
            if self.state.score.is_some() { "present" } else { "missing" },
            self.state.tips.len(),
            self.state.insights.len()
        );
    }

    pub fn leave(&self) {
        self.ctx.leave();
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![navbar::render(Route::CreditEducation), String::new()];

        match &self.state.score {
            Some(snapshot) => {
                lines.push(format!("Your Credit Score: {}", snapshot.score));
                let source = snapshot.provider.as_deref().unwrap_or("Unknown provider");
                lines.push(format!("  {} · {}", source, format_display_date(snapshot.date)));
            }
            None => lines.push(NO_SCORE.to_string()),
        }
        lines.push(String::new());

        if !self.state.insights.is_empty() {
            lines.push("Insights".to_string());
            lines.extend(render_tips(&self.state.insights));
            lines.push(String::new());
        }

        lines.push("Tips".to_string());
        if self.state.tips.is_empty() {
            lines.push(format!("  {}", NO_TIPS));
        } else {
            lines.extend(render_tips(&self.state.tips));
        }
        lines.push(String::new());
        lines.push(BANNER.to_string());
        lines
    }
}

fn render_tips(tips: &[CreditTip]) -> Vec<String> {
    tips.iter()
        .flat_map(|tip| {
            let title = match &tip.category {
                Some(category) => format!("  • {} [{}]", tip.title, category),
                None => format!("  • {}", tip.title),
            };
            [title, format!("    {}", tip.content)]
        })
        .collect()
}
