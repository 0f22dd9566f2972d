#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use design_review_http::{ClientOptions, ReviewClient};
use serde_json::{json, Value as JsonValue};

#[derive(Clone)]
pub enum MockBody {
    Json(JsonValue),
    Html(String),
}

#[derive(Clone)]
pub struct MockResponse {
    status: StatusCode,
    body: MockBody,
    delay: Duration,
    set_cookie: Option<String>,
}

impl MockResponse {
    pub fn json(status: StatusCode, body: JsonValue) -> Self {
        Self {
            status,
            body: MockBody::Json(body),
            delay: Duration::from_millis(0),
            set_cookie: None,
        }
    }

    pub fn html(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: MockBody::Html(body.to_owned()),
            delay: Duration::from_millis(0),
            set_cookie: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.set_cookie = Some(cookie.to_owned());
        self
    }
}

/// One request as seen by the mock server.
#[derive(Clone, Debug)]
pub struct Hit {
    pub path: String,
    pub content_type: Option<String>,
    pub cookie: Option<String>,
    pub body: Vec<u8>,
}

impl Hit {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    hits: Arc<Mutex<Vec<Hit>>>,
}

async fn service_handler(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };

    state
        .hits
        .lock()
        .expect("hit log mutex must not be poisoned")
        .push(Hit {
            path: uri.path().to_owned(),
            content_type: header_text(header::CONTENT_TYPE),
            cookie: header_text(header::COOKIE),
            body: body.to_vec(),
        });

    let response = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "no mock response available"}),
            )
        })
    };

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    let mut reply = match response.body {
        MockBody::Json(body) => (response.status, Json(body)).into_response(),
        MockBody::Html(body) => (
            response.status,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            body,
        )
            .into_response(),
    };

    if let Some(cookie) = response.set_cookie {
        reply.headers_mut().insert(
            header::SET_COOKIE,
            HeaderValue::from_str(&cookie).expect("cookie must be a valid header value"),
        );
    }

    reply
}

pub struct TestServer {
    pub base_url: String,
    hits: Arc<Mutex<Vec<Hit>>>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TestServer {
    pub fn hits(&self) -> Vec<Hit> {
        self.hits
            .lock()
            .expect("hit log mutex must not be poisoned")
            .clone()
    }

    pub fn hit_count(&self) -> usize {
        self.hits().len()
    }

    /// Client with millisecond backoff so retry tests stay fast.
    pub fn client(&self, max_attempts: usize) -> ReviewClient {
        ReviewClient::new(&self.base_url)
            .expect("must build client")
            .with_options(ClientOptions {
                max_attempts,
                retry_backoff_ms: 1,
                ..ClientOptions::default()
            })
    }
}

pub async fn spawn_server(responses: Vec<MockResponse>) -> TestServer {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        hits: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .fallback(service_handler)
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    TestServer {
        base_url: format!("http://{address}"),
        hits: state.hits,
        task,
    }
}

pub fn review_body(content: &str, used: u32, limit: u32) -> JsonValue {
    json!({
        "review": {
            "review_content": content,
            "is_premium": limit > 5
        },
        "rate_info": {
            "requests_used": used,
            "requests_limit": limit
        }
    })
}

pub fn email_body(is_supporter: bool) -> JsonValue {
    json!({
        "status": "success",
        "supporter_status": {
            "is_supporter": is_supporter,
            "tier": if is_supporter { "premium" } else { "free" }
        },
        "rate_info": {
            "requests_used": 0,
            "requests_limit": if is_supporter { 15 } else { 5 }
        }
    })
}
