use serde::Deserialize;

use crate::{RateInfo, SupporterStatus};

/// Fields every service response may carry to report failure.
#[derive(Debug, Default, Deserialize)]
pub struct FailureFields {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FailureFields {
    /// Message the service wants shown, if the body reports a failure.
    pub fn failure_message(&self) -> Option<String> {
        self.error.as_ref()?;
        self.message
            .clone()
            .filter(|message| !message.is_empty())
            .or_else(|| self.error.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub review: Option<ReviewBody>,
    #[serde(default)]
    pub rate_info: Option<RateInfo>,
    #[serde(flatten)]
    pub failure: FailureFields,
}

#[derive(Debug, Deserialize)]
pub struct ReviewBody {
    #[serde(default)]
    pub review_content: Option<ReviewContent>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(flatten)]
    pub failure: FailureFields,
}

/// Model output arrives either as one string or as a list of chunks.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReviewContent {
    Text(String),
    Chunks(Vec<String>),
}

impl ReviewContent {
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Chunks(chunks) => chunks.concat(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetEmailResponse {
    #[serde(default)]
    pub supporter_status: Option<SupporterStatus>,
    #[serde(default)]
    pub rate_info: Option<RateInfo>,
    #[serde(flatten)]
    pub failure: FailureFields,
}
