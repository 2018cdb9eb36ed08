//! Shared fixtures: a wiremock server standing in for both the Bot API and
//! the completion API, plus a recording fake rasterizer.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use vision_relay::{Dispatcher, PageRasterizer, RasterImage, RelayConfig, RelayError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const TOKEN: &str = "123456:test-token";
pub const API_KEY: &str = "sk-test";
pub const CHAT_ID: i64 = 4242;
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-page";

/// Rasterizer that records every requested page index.
pub struct RecordingRasterizer {
    pub pages: Mutex<Vec<u16>>,
    fail_with_empty: bool,
}

impl RecordingRasterizer {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(Vec::new()),
            fail_with_empty: false,
        })
    }

    pub fn empty_document() -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(Vec::new()),
            fail_with_empty: true,
        })
    }

    pub fn calls(&self) -> Vec<u16> {
        self.pages.lock().unwrap().clone()
    }
}

impl PageRasterizer for RecordingRasterizer {
    fn render_page(&self, _document: &[u8], page: u16) -> Result<RasterImage, RelayError> {
        self.pages.lock().unwrap().push(page);
        if self.fail_with_empty {
            return Err(RelayError::EmptyDocument);
        }
        Ok(RasterImage {
            png: FAKE_PNG.to_vec(),
        })
    }
}

pub fn config_for(server: &MockServer) -> vision_relay::RelayConfigBuilder {
    RelayConfig::builder()
        .bot_token(TOKEN)
        .openai_api_key(API_KEY)
        .telegram_api_base(server.uri())
        .openai_api_base(server.uri())
}

/// Route library logs to the test harness; `RUST_LOG=debug` shows stage detail.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn dispatcher(server: &MockServer, rasterizer: Arc<RecordingRasterizer>) -> Dispatcher {
    init_tracing();
    let config = config_for(server).build().expect("valid config");
    Dispatcher::new(Arc::new(config), rasterizer)
}

pub fn bot_path(method_name: &str) -> String {
    format!("/bot{TOKEN}/{method_name}")
}

pub fn file_path(relative: &str) -> String {
    format!("/file/bot{TOKEN}/{relative}")
}

// ── Mounts ───────────────────────────────────────────────────────────────

pub async fn mount_get_file(server: &MockServer, file_id: &str, relative: &str) {
    Mock::given(method("GET"))
        .and(path(bot_path("getFile")))
        .and(query_param("file_id", file_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"file_id": file_id, "file_size": 1024, "file_path": relative}
        })))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_get_file_not_found(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(bot_path("getFile")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: invalid file_id"
        })))
        .mount(server)
        .await;
}

pub async fn mount_completion(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", format!("Bearer {API_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(text)))
        .mount(server)
        .await;
}

pub async fn mount_completion_status(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_send(server: &MockServer, method_name: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(bot_path(method_name)))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(json!({"ok": status == 200, "result": {}})),
        )
        .mount(server)
        .await;
}

pub fn completion(text: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    })
}

// ── Inspection ───────────────────────────────────────────────────────────

pub async fn requests_to(server: &MockServer, request_path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == request_path)
        .collect()
}

/// `text` of every `sendMessage` call, in order.
pub async fn sent_texts(server: &MockServer) -> Vec<String> {
    requests_to(server, &bot_path("sendMessage"))
        .await
        .iter()
        .map(|r| {
            let body: Value = r.body_json().expect("sendMessage body is JSON");
            assert_eq!(body["parse_mode"], "Markdown");
            body["text"].as_str().unwrap_or_default().to_string()
        })
        .collect()
}

/// Paths of every Bot API / completion request, in arrival order.
pub async fn request_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

// ── Updates ──────────────────────────────────────────────────────────────

pub fn photo_update(file_ids: &[&str]) -> Value {
    let photo: Vec<Value> = file_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let side = 90 * (i as u32 + 1);
            json!({"file_id": id, "file_unique_id": format!("u{i}"), "width": side, "height": side, "file_size": side * 100})
        })
        .collect();
    json!({
        "update_id": 1001,
        "message": {
            "message_id": 1,
            "from": {"id": 7, "is_bot": false, "first_name": "Sam"},
            "chat": {"id": CHAT_ID, "type": "private"},
            "date": 1_700_000_000,
            "photo": photo
        }
    })
}

pub fn document_update(file_id: &str, mime_type: &str) -> Value {
    json!({
        "update_id": 1002,
        "message": {
            "message_id": 2,
            "chat": {"id": CHAT_ID, "type": "private"},
            "date": 1_700_000_000,
            "document": {
                "file_id": file_id,
                "file_unique_id": "doc-u",
                "file_name": "registration.pdf",
                "mime_type": mime_type,
                "file_size": 52_000
            }
        }
    })
}

pub fn text_update(text: &str) -> Value {
    json!({
        "update_id": 1003,
        "message": {
            "message_id": 3,
            "chat": {"id": CHAT_ID, "type": "private"},
            "date": 1_700_000_000,
            "text": text,
            "photo": []
        }
    })
}

pub fn parse_update(value: Value) -> vision_relay::Update {
    serde_json::from_value(value).expect("fixture is a valid update")
}
