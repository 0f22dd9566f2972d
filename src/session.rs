//! Per-session controller for the upload-and-review flow.
//!
//! One [`ReviewSession`] is built per page load or app session. It owns the
//! account and quota state the UI displays, rejects duplicate submissions
//! while a call is in flight, and is reset with [`ReviewSession::teardown`].

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use crate::{
    validate::{truncate_context, MAX_CONTEXT_CHARS},
    AnalyzeOutcome, EmailOutcome, ImageUpload, RateInfo, Result, Review, ReviewClient,
    ReviewError, SupporterStatus, Tier,
};

/// State the UI renders from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub supporter_status: Option<SupporterStatus>,
    pub rate_info: Option<RateInfo>,
    pub last_review: Option<Review>,
    pub last_error: Option<String>,
    pub context_draft: String,
}

/// Live character-counter view of the context field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextInput {
    /// Text after clipping to the limit.
    pub text: String,
    /// Characters in the input as typed, before clipping.
    pub chars: usize,
    /// Whether the typed input exceeded the limit and was clipped.
    pub over_limit: bool,
}

/// Controller for one upload-and-review session.
///
/// At most one call runs at a time. Results of a call that was still running
/// when [`ReviewSession::teardown`] ran are returned to the caller but not
/// recorded.
pub struct ReviewSession {
    client: ReviewClient,
    in_flight: AtomicBool,
    generation: AtomicU64,
    state: Mutex<SessionState>,
}

impl std::fmt::Debug for ReviewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewSession")
            .field("client", &self.client)
            .field("in_flight", &self.is_busy())
            .field("state", &*self.lock())
            .finish()
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ReviewSession {
    /// Creates an idle session with empty state around `client`.
    pub fn new(client: ReviewClient) -> Self {
        Self {
            client,
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Underlying client, for calls that bypass session bookkeeping.
    pub fn client(&self) -> &ReviewClient {
        &self.client
    }

    /// Whether a submission is currently running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Uploads an image for review and records the outcome.
    ///
    /// Returns [`ReviewError::Busy`] without touching state when another
    /// call on this session has not finished yet.
    pub async fn submit_review(
        &self,
        upload: ImageUpload,
        context: &str,
    ) -> Result<AnalyzeOutcome> {
        let _guard = self.begin()?;
        let generation = self.generation.load(Ordering::Acquire);
        let result = self.client.analyze(upload, context).await;

        self.record(generation, &result, |state, outcome| {
            state.last_review = Some(outcome.review.clone());
            if let Some(rate_info) = outcome.rate_info {
                state.rate_info = Some(rate_info);
            }
        });

        result
    }

    /// Registers an email for the session and records the supporter status.
    pub async fn register_email(&self, email: &str) -> Result<EmailOutcome> {
        let _guard = self.begin()?;
        let generation = self.generation.load(Ordering::Acquire);
        let result = self.client.set_email(email).await;

        self.record(generation, &result, |state, outcome| {
            if let Some(status) = &outcome.supporter_status {
                state.supporter_status = Some(status.clone());
                if let Some(rate_info) = outcome.rate_info {
                    state.rate_info = Some(rate_info);
                }
            }
        });

        result
    }

    /// Feeds the current context text through the character counter and
    /// keeps the clipped draft.
    pub fn update_context(&self, text: &str) -> ContextInput {
        let chars = text.chars().count();
        let (clipped, _) = truncate_context(text);
        self.lock().context_draft = clipped.clone();
        ContextInput {
            text: clipped,
            chars,
            over_limit: chars > MAX_CONTEXT_CHARS,
        }
    }

    /// Last clipped context passed to [`ReviewSession::update_context`].
    pub fn context_draft(&self) -> String {
        self.lock().context_draft.clone()
    }

    /// Supporter status from the last successful email registration.
    pub fn supporter_status(&self) -> Option<SupporterStatus> {
        self.lock().supporter_status.clone()
    }

    /// Quota counters from the most recent response that carried them.
    pub fn rate_info(&self) -> Option<RateInfo> {
        self.lock().rate_info
    }

    pub fn last_review(&self) -> Option<Review> {
        self.lock().last_review.clone()
    }

    /// Message of the last failed call, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    /// Tier implied by the current supporter status.
    pub fn tier(&self) -> Tier {
        Tier::from_status(self.lock().supporter_status.as_ref())
    }

    /// Quota line such as `"3/5 Reviews Used"`.
    pub fn rate_label(&self) -> Option<String> {
        self.lock().rate_info.map(|info| {
            format!(
                "{}/{} Reviews Used",
                info.requests_used, info.requests_limit
            )
        })
    }

    /// Copy of the whole session state.
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    /// Clears all session state.
    ///
    /// A call still in flight keeps the session busy until it returns, and
    /// its outcome is discarded instead of being recorded.
    pub fn teardown(&self) {
        let mut state = self.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        *state = SessionState::default();
        drop(state);

        #[cfg(feature = "tracing")]
        tracing::debug!("review session torn down");
    }

    fn begin(&self) -> Result<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ReviewError::Busy)?;
        Ok(InFlight(&self.in_flight))
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record<T>(
        &self,
        generation: u64,
        result: &Result<T>,
        on_success: impl FnOnce(&mut SessionState, &T),
    ) {
        #[cfg(feature = "tracing")]
        if let Err(err) = result {
            tracing::error!(error = %err, "review session call failed");
        }

        let mut state = self.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            #[cfg(feature = "tracing")]
            tracing::debug!("discarding result of call started before teardown");
            return;
        }

        match result {
            Ok(value) => {
                on_success(&mut state, value);
                state.last_error = None;
            }
            Err(err) => state.last_error = Some(err.to_string()),
        }
    }
}
