//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};
use wiremock::{MockServer, Request, ResponseTemplate};

use ubq_api::{AdminClient, RequestExecutor, WaitPolicy, Waiter};
use ubq_core::config::ServerConfig;
use ubq_core::Credential;

/// Server settings pointing both origins at the mock server.
///
/// The bucket origin is `<mock>/s3/` so API and bucket requests can be told apart.
pub fn server_config(server: &MockServer) -> ServerConfig {
    ServerConfig {
        base_url: format!("{}/", server.uri()),
        base_s3_url: format!("{}/s3/", server.uri()),
        timeout_ms: 5_000,
        connect_timeout_ms: 1_000,
        ..ServerConfig::default()
    }
}

pub fn executor(server: &MockServer, credential: Option<Credential>) -> RequestExecutor {
    RequestExecutor::new(&server_config(server), credential).expect("failed to build executor")
}

pub fn admin(server: &MockServer) -> AdminClient {
    AdminClient::new(Credential::ApiKey("test-key".into()), &server_config(server))
        .expect("failed to build admin client")
}

/// A waiter that polls quickly enough for tests.
pub fn quick_waiter() -> Waiter {
    Waiter::new(
        WaitPolicy::default()
            .interval(Duration::from_millis(5))
            .max_attempts(20)
            .max_duration(Duration::from_secs(5)),
    )
}

/// An unsigned JWT whose payload carries `sub`.
pub fn jwt_for(sub: &str) -> String {
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": sub }).to_string());
    format!("eyJhbGciOiJIUzI1NiJ9.{payload}.signature")
}

/// Responder that walks through `bodies` in order, repeating the last one.
///
/// Returns the responder and a counter of requests served.
pub fn sequence(
    bodies: Vec<Value>,
) -> (
    impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static,
    Arc<AtomicUsize>,
) {
    let served = Arc::new(AtomicUsize::new(0));
    let counter = served.clone();
    let responder = move |_req: &Request| -> ResponseTemplate {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        let body = bodies
            .get(n)
            .or_else(|| bodies.last())
            .cloned()
            .unwrap_or(Value::Null);
        ResponseTemplate::new(200).set_body_json(body)
    };
    (responder, served)
}

// ---- JSON fixtures ----

pub fn page(results: Vec<Value>, next: Option<String>) -> Value {
    json!({
        "count": results.len(),
        "next": next,
        "previous": null,
        "results": results,
    })
}

pub fn app(base: &str, token: &str) -> Value {
    json!({
        "url": format!("{base}/api/v2/apps/{token}/"),
        "id": 1,
        "token": token,
        "public_key": "",
        "forms": format!("{base}/api/v2/apps/{token}/forms/"),
        "messages": format!("{base}/api/v2/apps/{token}/messages/"),
        "weblinks": format!("{base}/api/v2/apps/{token}/weblinks/")
    })
}

pub fn content_item(base: &str, kind: &str, uuid: &str) -> Value {
    let url = format!("{base}/api/v2/apps/abc/{kind}/{uuid}/");
    json!({
        "url": url,
        "uuid": uuid,
        "name": format!("{kind} {uuid}"),
        "slug": uuid,
        "description": "",
        "versions": format!("{url}versions/"),
        "publishing_records": format!("{url}publishing_records/"),
        "created": "2024-05-01T09:00:00Z",
        "modified": "2024-05-01T09:00:00Z",
        "is_available": false
    })
}

pub fn version(item_url: &str, number: u32, is_ready: bool) -> Value {
    json!({
        "url": format!("{item_url}versions/{number}/"),
        "name": format!("v{number}"),
        "number": number,
        "metadata": {},
        "is_ready": is_ready,
        "schema": {"type": "object"},
        "ui_schema": {}
    })
}

pub fn publishing_record(item_url: &str, id: u32, version_url: &str, status: &str) -> Value {
    json!({
        "url": format!("{item_url}publishing_records/{id}/"),
        "available": true,
        "version": version_url,
        "created": "2024-05-01T09:00:00Z",
        "created_by": "ops@example.com",
        "status": status
    })
}

pub fn upload(base: &str, uuid: &str, status: &str) -> Value {
    json!({
        "url": format!("{base}/api/v2/apps/abc/uploads/{uuid}/"),
        "uuid": uuid,
        "upload_url": format!("{base}/signed/{uuid}?signature=abc123"),
        "file_name": "leaflet.pdf",
        "content_type": "application/pdf",
        "status": status
    })
}
