use std::fmt;
use std::time::Duration;

use reqwest::header;
use serde_json::Value as JsonValue;

use crate::{
    retry::{Attempt, RetryPolicy},
    validate::{validate_context, validate_email, validate_image},
    wire::{AnalyzeResponse, SetEmailResponse},
    AnalyzeOutcome, ApiRequest, ClientOptions, EmailOutcome, ImageUpload, Payload, Result,
    Review, ReviewError,
};

/// Environment variable read by [`ReviewClient::from_env`].
pub const BASE_URL_ENV: &str = "DESIGN_REVIEW_BASE_URL";

#[derive(Clone)]
/// HTTP client for the design-review service.
///
/// Clones share one connection pool and one session cookie jar.
pub struct ReviewClient {
    http: reqwest::Client,
    anonymous: reqwest::Client,
    base_url: String,
    options: ClientOptions,
}

impl fmt::Debug for ReviewClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewClient")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}

impl ReviewClient {
    /// Creates a client rooted at `base_url` (e.g. `http://localhost:5001`).
    ///
    /// On native targets the client keeps a cookie store so the server-side
    /// session survives between calls. In browsers the fetch API handles
    /// cookies itself.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(ReviewError::InvalidArgument(
                "base url must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            http: build_http(true)?,
            anonymous: build_http(false)?,
            base_url: base_url.trim().trim_end_matches('/').to_owned(),
            options: ClientOptions::default(),
        })
    }

    /// Creates a client from the `DESIGN_REVIEW_BASE_URL` environment variable.
    ///
    /// **Not available on `wasm32` targets**; pass the page origin to
    /// [`ReviewClient::new`] instead.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use design_review_http::ReviewClient;
    ///
    /// let client = ReviewClient::from_env().expect("missing DESIGN_REVIEW_BASE_URL");
    /// ```
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let url = std::env::var(BASE_URL_ENV)
            .map_err(|_| format!("missing {BASE_URL_ENV} environment variable"))?;
        if url.trim().is_empty() {
            return Err(format!("{BASE_URL_ENV} is set but empty"));
        }
        Self::new(url).map_err(|err| err.to_string())
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Options in effect for this client.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Absolute URL for a service path such as `/analyze`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Uploads an image for review.
    ///
    /// The upload and context are validated first; nothing is sent when
    /// either is rejected.
    pub async fn analyze(&self, upload: ImageUpload, context: &str) -> Result<AnalyzeOutcome> {
        validate_image(&upload)?;
        let context = validate_context(context)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            file_name = %upload.file_name,
            size = upload.bytes.len(),
            "submitting image for review"
        );

        let payload = Payload::form()
            .file("image", upload)
            .text("context", context);
        let request = ApiRequest::post(self.endpoint("/analyze"), payload);
        let value = self.send(&request, self.options.max_attempts).await?;
        decode_analyze(value)
    }

    /// Associates an email with the current session and returns the
    /// supporter status the server derived from it.
    pub async fn set_email(&self, email: &str) -> Result<EmailOutcome> {
        let email = validate_email(email)?;
        let payload = Payload::form().text("email", email);
        let request = ApiRequest::post(self.endpoint("/set-email"), payload);
        let value = self.send(&request, self.options.max_attempts).await?;
        decode_set_email(value)
    }

    /// Sends `request`, retrying transient failures up to `max_attempts`
    /// attempts in total, and returns the parsed JSON body.
    pub async fn send(&self, request: &ApiRequest, max_attempts: usize) -> Result<JsonValue> {
        if request.url.trim().is_empty() {
            return Err(ReviewError::InvalidArgument(
                "request url must not be empty".to_owned(),
            ));
        }

        RetryPolicy::new(&self.options, max_attempts)
            .run(move |_| async move { Attempt::from(self.send_once(request).await) })
            .await
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<JsonValue> {
        let http = if request.include_credentials {
            &self.http
        } else {
            &self.anonymous
        };

        let mut builder = http
            .request(request.method.clone(), &request.url)
            .header(header::ACCEPT, "application/json");

        if let Some(timeout_ms) = self.options.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        // fetch defaults to same-origin credentials; be explicit both ways.
        #[cfg(target_arch = "wasm32")]
        {
            builder = if request.include_credentials {
                builder.fetch_credentials_include()
            } else {
                builder.fetch_credentials_omit()
            };
        }

        if let Some(form) = request.body.to_multipart()? {
            builder = builder.multipart(form);
        }

        let response = builder.send().await.map_err(ReviewError::Transport)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.map_err(ReviewError::Transport)?;

        classify_response(status, content_type.as_deref(), body)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http(cookies: bool) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .cookie_store(cookies)
        .build()
        .map_err(ReviewError::Transport)
}

/// The browser owns the cookie jar on wasm; credentials are chosen per request
/// in `send_once`.
#[cfg(target_arch = "wasm32")]
fn build_http(_cookies: bool) -> Result<reqwest::Client> {
    Ok(reqwest::Client::new())
}

/// Turns a raw response into the parsed JSON body or a classified error.
pub(crate) fn classify_response(
    status: u16,
    content_type: Option<&str>,
    body: String,
) -> Result<JsonValue> {
    let is_json = content_type.is_some_and(|value| value.contains("application/json"));
    if !is_json {
        return Err(ReviewError::Protocol { status, body });
    }

    let data = match serde_json::from_str::<JsonValue>(&body) {
        Ok(data) => data,
        Err(_) => return Err(ReviewError::Protocol { status, body }),
    };

    if !(200..300).contains(&status) {
        return Err(ReviewError::Application {
            status,
            message: failure_message(&data, status),
        });
    }

    Ok(data)
}

fn failure_message(data: &JsonValue, status: u16) -> String {
    ["message", "error"]
        .iter()
        .filter_map(|key| data.get(*key).and_then(JsonValue::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("HTTP error {status}"))
}

pub(crate) fn decode_analyze(value: JsonValue) -> Result<AnalyzeOutcome> {
    let response: AnalyzeResponse = serde_json::from_value(value)
        .map_err(|err| ReviewError::Decode(format!("invalid analyze response: {err}")))?;

    if let Some(message) = response.failure.failure_message() {
        return Err(ReviewError::Application {
            status: 200,
            message,
        });
    }

    let review = response
        .review
        .ok_or_else(|| ReviewError::Decode("missing review in analyze response".to_owned()))?;
    if let Some(message) = review.failure.failure_message() {
        return Err(ReviewError::Application {
            status: 200,
            message,
        });
    }

    let content = review
        .review_content
        .map(|content| content.into_text())
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| ReviewError::Decode("review content is empty or invalid".to_owned()))?;

    Ok(AnalyzeOutcome {
        review: Review {
            content,
            is_premium: review.is_premium,
        },
        rate_info: response.rate_info,
    })
}

pub(crate) fn decode_set_email(value: JsonValue) -> Result<EmailOutcome> {
    let response: SetEmailResponse = serde_json::from_value(value)
        .map_err(|err| ReviewError::Decode(format!("invalid set-email response: {err}")))?;

    if let Some(message) = response.failure.failure_message() {
        return Err(ReviewError::Application {
            status: 200,
            message,
        });
    }

    Ok(EmailOutcome {
        supporter_status: response.supporter_status,
        rate_info: response.rate_info,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{classify_response, decode_analyze, decode_set_email, ReviewClient};
    use crate::ReviewError;

    #[test]
    fn json_success_is_returned_unchanged() {
        let body = json!({"review": {"review_content": "ok"}, "nested": [1, 2, 3]});
        let parsed = classify_response(200, Some("application/json"), body.to_string())
            .expect("must succeed");
        assert_eq!(parsed, body);
    }

    #[test]
    fn non_json_content_type_is_protocol_error_regardless_of_status() {
        for status in [200u16, 404, 500] {
            let err = classify_response(
                status,
                Some("text/html; charset=utf-8"),
                "<h1>oops</h1>".to_owned(),
            )
            .expect_err("must fail");
            match err {
                ReviewError::Protocol { status: got, body } => {
                    assert_eq!(got, status);
                    assert_eq!(body, "<h1>oops</h1>");
                }
                other => panic!("expected protocol error, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_content_type_is_protocol_error() {
        let err = classify_response(200, None, "{}".to_owned()).expect_err("must fail");
        assert!(matches!(err, ReviewError::Protocol { .. }));
    }

    #[test]
    fn json_failure_message_precedence() {
        let cases = [
            (json!({"message": "m", "error": "e"}), "m"),
            (json!({"error": "rate limited"}), "rate limited"),
            (json!({"message": "", "error": "e"}), "e"),
            (json!({"detail": "x"}), "HTTP error 429"),
        ];
        for (body, expected) in cases {
            let err = classify_response(429, Some("application/json"), body.to_string())
                .expect_err("must fail");
            match err {
                ReviewError::Application { status, message } => {
                    assert_eq!(status, 429);
                    assert_eq!(message, expected);
                }
                other => panic!("expected application error, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_json_is_protocol_error() {
        let err = classify_response(200, Some("application/json"), "{not json".to_owned())
            .expect_err("must fail");
        assert!(matches!(err, ReviewError::Protocol { status: 200, .. }));
    }

    #[test]
    fn decode_analyze_surfaces_nested_review_error() {
        let err = decode_analyze(json!({
            "review": {
                "error": "Failed to generate review",
                "message": "model overloaded",
                "is_premium": false
            }
        }))
        .expect_err("must fail");
        assert_eq!(err.to_string(), "model overloaded");
    }

    #[test]
    fn decode_analyze_rejects_empty_content() {
        let err =
            decode_analyze(json!({"review": {"review_content": "  "}})).expect_err("must fail");
        assert!(matches!(err, ReviewError::Decode(_)));
    }

    #[test]
    fn decode_analyze_keeps_content_and_rate_info() {
        let outcome = decode_analyze(json!({
            "review": {"review_content": "## Overview\nNice.", "is_premium": true},
            "rate_info": {"requests_used": 2, "requests_limit": 15}
        }))
        .expect("must decode");
        assert_eq!(outcome.review.content, "## Overview\nNice.");
        assert!(outcome.review.is_premium);
        assert_eq!(outcome.rate_info.map(|info| info.requests_used), Some(2));
    }

    #[test]
    fn decode_set_email_top_level_error() {
        let err = decode_set_email(json!({"error": "Email is required"})).expect_err("must fail");
        assert!(matches!(err, ReviewError::Application { status: 200, .. }));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = ReviewClient::new("http://localhost:5001/").expect("must build");
        assert_eq!(client.endpoint("/analyze"), "http://localhost:5001/analyze");
        assert_eq!(client.endpoint("set-email"), "http://localhost:5001/set-email");
    }

    #[test]
    fn empty_base_url_is_rejected() {
        assert!(matches!(
            ReviewClient::new("  "),
            Err(ReviewError::InvalidArgument(_))
        ));
    }
}
