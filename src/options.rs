/// Configures timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds. `None` leaves it to the transport.
    pub timeout_ms: Option<u64>,
    /// Total attempts per call, including the first one. Must be at least 1.
    pub max_attempts: usize,
    /// Base retry backoff in milliseconds (exponential strategy).
    pub retry_backoff_ms: u64,
    /// Also retry responses that were not JSON.
    pub retry_protocol_errors: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            max_attempts: 3,
            retry_backoff_ms: 1_000,
            retry_protocol_errors: false,
        }
    }
}
