use crate::validate::ValidationError;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// Local input rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Endpoint answered with something other than JSON.
    #[error("expected JSON, got: {body}")]
    Protocol {
        /// HTTP status of the offending response.
        status: u16,
        /// Raw response body text.
        body: String,
    },
    /// JSON failure reported by the service, either through a non-success
    /// status or an `error` field in the body.
    #[error("{message}")]
    Application {
        /// HTTP status; `200` when the failure came from the body alone.
        status: u16,
        /// Message taken from `message`, then `error`, then the status.
        message: String,
    },
    /// JSON body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// Caller-supplied argument that can never succeed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A session call was made while another one was still in flight.
    #[error("a request is already in progress")]
    Busy,
}

impl ReviewError {
    /// Whether the retry loop may attempt the request again after this error.
    ///
    /// Protocol errors are excluded here; the client opts them in through
    /// [`ClientOptions::retry_protocol_errors`](crate::ClientOptions).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Application { .. })
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Protocol { status, .. } | Self::Application { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}
