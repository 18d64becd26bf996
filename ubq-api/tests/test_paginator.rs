//! Integration tests for the paging cursor.

mod common;

use futures::TryStreamExt;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ubq_api::Paginator;
use ubq_models::App;

async fn mount_two_pages(server: &MockServer) {
    let next = format!("{}/api/v2/apps/?page=2", server.uri());
    Mock::given(method("GET"))
        .and(path("/list/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::page(vec![json!("a"), json!("b")], Some(next))),
        )
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/apps/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(vec![json!("c")], None)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn follows_next_links_until_exhausted() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let exec = common::executor(&server, None);
    let mut cursor: Paginator<String> = Paginator::new(exec.clone()).begin(exec.url("list/"));

    assert!(cursor.has_next());
    assert_eq!(cursor.next().await.unwrap(), Some(vec!["a".to_string(), "b".to_string()]));
    assert!(cursor.has_next());
    assert_eq!(cursor.next().await.unwrap(), Some(vec!["c".to_string()]));
    assert!(!cursor.has_next());
    assert_eq!(cursor.next().await.unwrap(), None);
}

#[tokio::test]
async fn stream_yields_every_page() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let exec = common::executor(&server, None);
    let pages: Vec<Vec<String>> = Paginator::new(exec.clone())
        .begin(exec.url("list/"))
        .into_stream()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(pages, vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]);
}

#[tokio::test]
async fn failed_fetch_can_be_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list/"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/list/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(vec![json!(1)], None)))
        .mount(&server)
        .await;

    let exec = common::executor(&server, None);
    let mut cursor: Paginator<Value> = Paginator::new(exec.clone()).begin(exec.url("list/"));

    let err = cursor.next().await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert!(cursor.has_next());
    assert_eq!(cursor.next().await.unwrap(), Some(vec![json!(1)]));
    assert!(!cursor.has_next());
}

#[tokio::test]
async fn admin_apps_cursor_collects_all() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/api/v2/apps/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page(
            vec![common::app(&base, "one"), common::app(&base, "two")],
            None,
        )))
        .mount(&server)
        .await;

    let apps: Vec<App> = common::admin(&server).apps().collect_all().await.unwrap();
    let tokens: Vec<&str> = apps.iter().map(|a| a.token.as_str()).collect();
    assert_eq!(tokens, ["one", "two"]);
}
