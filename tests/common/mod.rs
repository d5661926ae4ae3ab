// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bytes::Bytes;
use http_body_util::BodyExt;
use scraper::{Html, Selector};
use serde_json::Value;
use tower::ServiceExt;

use embed_server::{
    embed::ParamPolicy,
    relay::{RelayError, UploadRelay},
    state::AppState,
};

pub const TEST_BODY_LIMIT: usize = 1024 * 1024;
pub const STUB_URL: &str = "https://files.catbox.moe/stub01.png";

// ── Stub relay ───────────────────────────────────────────────────────────────

/// A file the stub relay was asked to store.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// In-memory relay that records every call and answers with a fixed outcome.
pub struct StubRelay {
    outcome: Result<String, String>,
    calls: Mutex<Vec<StoredFile>>,
}

impl StubRelay {
    pub fn succeeding(url: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(url.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<StoredFile> {
        self.calls.lock().unwrap().clone()
    }
}

#[axum::async_trait]
impl UploadRelay for StubRelay {
    async fn store(
        &self,
        bytes: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<String, RelayError> {
        self.calls.lock().unwrap().push(StoredFile {
            bytes: bytes.to_vec(),
            filename: filename.to_string(),
            content_type: content_type.to_string(),
        });
        self.outcome.clone().map_err(RelayError::Rejected)
    }
}

// ── App construction ─────────────────────────────────────────────────────────

/// Build the full application router around the given relay.
pub fn create_test_app(relay: Arc<StubRelay>) -> Router {
    create_test_app_with_policy(relay, ParamPolicy::Passthrough)
}

pub fn create_test_app_with_policy(relay: Arc<StubRelay>, param_policy: ParamPolicy) -> Router {
    let state = AppState {
        relay,
        param_policy,
    };
    embed_server::router(state, TEST_BODY_LIMIT)
}

/// App whose relay always succeeds; for tests that never upload.
pub fn default_app() -> Router {
    create_test_app(StubRelay::succeeding(STUB_URL))
}

/// base64url without padding, the encoding clients use for text params.
pub fn b64url(s: &str) -> String {
    URL_SAFE_NO_PAD.encode(s.as_bytes())
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw_json(app, uri, body.to_string()).await
}

pub async fn post_raw_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get_text(app, uri).await;
    (status, serde_json::from_str(&body).unwrap_or(Value::Null))
}

/// GET `uri` and return status, `Content-Type`, and body text.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String, String) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

/// GET an embed page and return its HTML, asserting a 200 `text/html` response.
pub async fn get_embed(app: Router, query: &str) -> String {
    let uri = if query.is_empty() {
        "/embed".to_string()
    } else {
        format!("/embed?{query}")
    };
    let (status, content_type, body) = get_text(app, &uri).await;
    assert_eq!(status, StatusCode::OK, "embed failed: {body}");
    assert!(
        content_type.starts_with("text/html"),
        "unexpected content type {content_type}"
    );
    body
}

// ── Document helpers ─────────────────────────────────────────────────────────

/// `content` of the first `<meta {attr}="{key}">`, entity-decoded.
pub fn meta_content(html: &str, attr: &str, key: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(&format!(r#"meta[{attr}="{key}"]"#)).unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::to_string)
}

/// Text of the first element matching `css`, entity-decoded.
pub fn element_text(html: &str, css: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(css).unwrap();
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// `src` of the body image.
pub fn image_src(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("body img").unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("src"))
        .map(str::to_string)
}
