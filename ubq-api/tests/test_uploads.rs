//! Integration tests for the two-phase upload flow.

mod common;

use std::sync::atomic::Ordering;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ubq_core::UbqError;
use ubq_models::{NewUpload, Upload, UploadStatus};

const UPLOADS: &str = "/api/v2/apps/abc/uploads/";

#[tokio::test]
async fn full_upload_flow() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("POST"))
        .and(path(UPLOADS))
        .and(body_partial_json(json!({"file_name": "leaflet.pdf", "size": 11})))
        .respond_with(ResponseTemplate::new(201).set_body_json(common::upload(&base, "up-1", "awaiting_upload")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/signed/up-1"))
        .and(header("content-type", "application/pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{UPLOADS}up-1/complete/")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let (responder, served) = common::sequence(vec![
        common::upload(&base, "up-1", "processing"),
        common::upload(&base, "up-1", "processing"),
        common::upload(&base, "up-1", "complete"),
    ]);
    Mock::given(method("GET"))
        .and(path(format!("{UPLOADS}up-1/")))
        .respond_with(responder)
        .mount(&server)
        .await;

    let uploads = common::admin(&server).uploads("abc");
    let upload = uploads
        .upload("leaflet.pdf", "application/pdf", b"%PDF-1.7...".to_vec(), &common::quick_waiter())
        .await
        .unwrap();
    assert_eq!(upload.status, UploadStatus::Complete);
    // One read after the bodiless acknowledgement, then two polls.
    assert_eq!(served.load(Ordering::SeqCst), 3);

    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("no PUT received");
    assert!(put.headers.get("authorization").is_none());
    assert_eq!(put.body, b"%PDF-1.7...");
    let ticket = requests
        .iter()
        .find(|r| r.url.path() == UPLOADS)
        .expect("no ticket request");
    assert_eq!(ticket.headers.get("authorization").unwrap(), "Token test-key");
}

#[tokio::test]
async fn failed_processing_is_operation_failed() {
    let server = MockServer::start().await;
    let base = server.uri();
    let mut failed = common::upload(&base, "up-2", "failed");
    failed["error"] = json!("unsupported file");
    Mock::given(method("GET"))
        .and(path(format!("{UPLOADS}up-2/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(failed))
        .expect(1)
        .mount(&server)
        .await;

    let ticket: Upload = serde_json::from_value(common::upload(&base, "up-2", "processing")).unwrap();
    let err = common::admin(&server)
        .uploads("abc")
        .await_upload(&ticket, &common::quick_waiter())
        .await
        .unwrap_err();
    match err {
        UbqError::OperationFailed { operation, snapshot } => {
            assert_eq!(operation, "upload processing");
            assert_eq!(snapshot["error"], "unsupported file");
        }
        other => panic!("expected OperationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn ticket_without_signed_url_cannot_be_sent() {
    let server = MockServer::start().await;
    let mut ticket: Upload =
        serde_json::from_value(common::upload(&server.uri(), "up-3", "processing")).unwrap();
    ticket.upload_url = None;

    let err = common::admin(&server)
        .uploads("abc")
        .put_upload_bytes(&ticket, vec![1, 2, 3])
        .await
        .unwrap_err();
    assert!(matches!(err, UbqError::InvalidUrl(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn request_upload_returns_ticket() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOADS))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(common::upload(&server.uri(), "up-4", "awaiting_upload")),
        )
        .mount(&server)
        .await;

    let ticket = common::admin(&server)
        .uploads("abc")
        .request_upload(&NewUpload {
            file_name: "leaflet.pdf".into(),
            content_type: "application/pdf".into(),
            size: None,
        })
        .await
        .unwrap();
    assert_eq!(ticket.status, UploadStatus::AwaitingUpload);
    assert!(ticket.upload_url.unwrap().contains("signature="));
}
