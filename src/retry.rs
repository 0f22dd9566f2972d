use std::future::Future;
use std::time::Duration;

use crate::{ClientOptions, Result, ReviewError};

/// Result of a single attempt. The loop inspects this instead of unwinding.
#[derive(Debug)]
pub(crate) enum Attempt<T> {
    Success(T),
    Failure(ReviewError),
}

impl<T> From<Result<T>> for Attempt<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failure(err),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub max_attempts: usize,
    pub backoff_ms: u64,
    pub retry_protocol_errors: bool,
}

impl RetryPolicy {
    pub(crate) fn new(options: &ClientOptions, max_attempts: usize) -> Self {
        Self {
            max_attempts,
            backoff_ms: options.retry_backoff_ms,
            retry_protocol_errors: options.retry_protocol_errors,
        }
    }

    /// Delay between attempt `attempt` (0-indexed) and the next one.
    pub(crate) fn delay_after(&self, attempt: usize) -> Duration {
        let exp = attempt.min(16) as u32;
        let multiplier = 1u64 << exp;
        Duration::from_millis(self.backoff_ms.saturating_mul(multiplier))
    }

    fn should_retry(&self, err: &ReviewError) -> bool {
        err.is_retryable()
            || (self.retry_protocol_errors && matches!(err, ReviewError::Protocol { .. }))
    }

    /// Runs `attempt` until it succeeds, fails with a final error, or the
    /// attempt budget is spent. The last error is always returned.
    pub(crate) async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Attempt<T>>,
    {
        if self.max_attempts == 0 {
            return Err(ReviewError::InvalidArgument(
                "max attempts must be at least 1".to_owned(),
            ));
        }

        let mut index = 0usize;
        loop {
            let err = match attempt(index).await {
                Attempt::Success(value) => return Ok(value),
                Attempt::Failure(err) => err,
            };

            #[cfg(feature = "tracing")]
            tracing::warn!(attempt = index + 1, error = %err, "attempt failed");

            if index + 1 >= self.max_attempts || !self.should_retry(&err) {
                return Err(err);
            }

            let delay = self.delay_after(index);

            #[cfg(feature = "tracing")]
            tracing::debug!("retrying request after {} ms", delay.as_millis());

            sleep(delay).await;
            index += 1;
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(delay: Duration) {
    tokio::time::sleep(delay).await;
}

/// Browser sleep backed by `setTimeout`. Resolves immediately when the
/// global has no `setTimeout`.
#[cfg(target_arch = "wasm32")]
async fn sleep(delay: Duration) {
    use wasm_bindgen::{JsCast, JsValue};

    let millis = delay.as_millis().min(i32::MAX as u128) as f64;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let global = js_sys::global();
        let scheduled = js_sys::Reflect::get(&global, &JsValue::from_str("setTimeout"))
            .ok()
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
            .map(|set_timeout| set_timeout.call2(&global, &resolve, &JsValue::from_f64(millis)))
            .is_some_and(|called| called.is_ok());
        if !scheduled {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}
