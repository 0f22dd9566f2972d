use serde::{Deserialize, Serialize};

/// Server-reported quota counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateInfo {
    pub requests_used: u32,
    pub requests_limit: u32,
}

impl RateInfo {
    /// Reviews left today; zero once the limit is reached.
    pub fn remaining(&self) -> u32 {
        self.requests_limit.saturating_sub(self.requests_used)
    }
}

/// Account tier as reported by the session status payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupporterStatus {
    pub is_supporter: bool,
    #[serde(default = "default_tier")]
    pub tier: String,
    #[serde(default)]
    pub last_support_date: Option<String>,
    #[serde(default)]
    pub total_support: Option<f64>,
}

fn default_tier() -> String {
    "free".to_owned()
}

/// Rendered-elsewhere review text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Review {
    /// Markdown body as produced by the service.
    pub content: String,
    pub is_premium: bool,
}

/// Successful `/analyze` result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyzeOutcome {
    pub review: Review,
    pub rate_info: Option<RateInfo>,
}

/// Successful `/set-email` result. Both fields are absent when the server
/// only acknowledged the email.
#[derive(Clone, Debug, PartialEq)]
pub struct EmailOutcome {
    pub supporter_status: Option<SupporterStatus>,
    pub rate_info: Option<RateInfo>,
}
