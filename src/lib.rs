//! `design-review-http` is an async HTTP client for a design-review service.
//!
//! The service accepts a JPEG/PNG screenshot plus optional context and
//! answers with a markdown review. The crate wraps it with:
//! - [`ReviewClient::send`]: JSON request with exponential-backoff retries
//! - [`ReviewClient::analyze`]: validated `POST /analyze`
//! - [`ReviewClient::set_email`]: validated `POST /set-email`
//! - [`ReviewSession`]: per-session controller holding quota and tier state

mod client;
mod error;
mod options;
mod request;
mod retry;
mod session;
mod tier;
mod types;
mod upload;
pub mod validate;
mod wire;

pub use client::{ReviewClient, BASE_URL_ENV};
pub use error::ReviewError;
pub use options::ClientOptions;
pub use request::{ApiRequest, FormField, FormValue, Payload};
pub use session::{ContextInput, ReviewSession, SessionState};
pub use tier::{Tier, SUPPORT_URL};
pub use types::{AnalyzeOutcome, EmailOutcome, RateInfo, Review, SupporterStatus};
pub use upload::ImageUpload;
pub use validate::ValidationError;

pub use reqwest::Method;

pub type Result<T> = std::result::Result<T, ReviewError>;
