//! `GET /messages/`: pagination, filters and read marking.

use crate::api::helpers::{TestApp, anonymous, user};
use axum::http::StatusCode;
use flashbox::config::FlashSettings;
use flashbox::flash::domain::Level;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn app() -> TestApp {
    TestApp::new(FlashSettings::default().with_page_sizes(2, 10))
}

fn texts(body: &Value) -> Vec<&str> {
    body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .filter_map(|item| item["message"].as_str())
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_page_is_returned_unread_then_marked_read(app: TestApp) {
    let member = user();
    app.seed(member, &[Level::Info; 5]).await;

    let (status, body) = app.get_as(member, "/messages/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    assert_eq!(body["next"], "/messages/?page=2");
    assert_eq!(body["previous"], Value::Null);
    assert_eq!(texts(&body), ["message 4", "message 3"]);
    assert_eq!(body["results"][0]["read_at"], Value::Null);
    assert_eq!(body["results"][0]["level"], 20);
    assert_eq!(body["results"][0]["level_tag"], "info");
    assert_eq!(body["results"][0]["view"], "seed");

    let (_, peek) = app.get_as(member, "/messages/peek/").await;
    assert_eq!(peek["count"], 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unread_messages_move_ahead_of_read_ones(app: TestApp) {
    let member = user();
    app.seed(member, &[Level::Info; 5]).await;
    app.get_as(member, "/messages/").await;

    let (_, body) = app.get_as(member, "/messages/").await;

    assert_eq!(texts(&body), ["message 2", "message 1"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn last_page_links_back(app: TestApp) {
    let member = user();
    app.seed(member, &[Level::Info; 5]).await;

    let (status, body) = app.get_as(member, "/messages/?page=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(texts(&body), ["message 0"]);
    assert_eq!(body["next"], Value::Null);
    assert_eq!(body["previous"], "/messages/?page=2");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_parameters_use_the_last_value(app: TestApp) {
    let member = user();
    app.seed(member, &[Level::Info; 5]).await;

    let (status, body) = app.get_as(member, "/messages/?page=1&page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(texts(&body), ["message 2", "message 1"]);
    assert_eq!(body["next"], "/messages/?page=3");
    assert_eq!(body["previous"], "/messages/");

    let (status, body) = app
        .get_as(member, "/messages/?unread=true&unread=maybe")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[rstest]
#[case("/messages/?page=4")]
#[case("/messages/?page=0")]
#[case("/messages/?page=last")]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_pages_are_not_found(app: TestApp, #[case] uri: &str) {
    let member = user();
    app.seed(member, &[Level::Info; 5]).await;

    let (status, body) = app.get_as(member, uri).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Invalid page." }));
}

#[rstest]
#[case("/messages/?unread=maybe")]
#[case("/messages/?level=high")]
#[case("/messages/?level_tag=critical")]
#[case("/messages/?created_after=yesterday")]
#[case("/messages/?read_before=2026-13-01T00:00:00Z")]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_filters_are_bad_requests(app: TestApp, #[case] uri: &str) {
    let (status, body) = app.get_as(user(), uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[rstest]
#[case("/messages/?extra_tags=attention&ordering=level", &["message 1", "message 2"])]
#[case("/messages/?level_tag=warning&ordering=-level", &["message 2", "message 1"])]
#[case("/messages/?level=20&ordering=created", &["message 0", "message 3"])]
#[case("/messages/?search=MESSAGE%203", &["message 3"])]
#[case("/messages/?created_after=2026-05-04T08:32:00Z&ordering=created", &["message 2", "message 3"])]
#[case("/messages/?unread=false", &[])]
#[tokio::test(flavor = "multi_thread")]
async fn filters_narrow_the_listing(#[case] uri: &str, #[case] expected: &[&str]) {
    let app = TestApp::new(FlashSettings::default());
    let member = user();
    app.seed(member, &[Level::Info, Level::Warning, Level::Error, Level::Info])
        .await;

    let (status, body) = app.get_as(member, uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(texts(&body), expected);
}

#[rstest]
#[case("/messages/?ordering=message", &["message 1", "message 0"])]
#[case("/messages/?ordering=message,-level", &["message 0", "message 1"])]
#[case("/messages/?ordering=-created,level", &["message 1", "message 0"])]
#[tokio::test(flavor = "multi_thread")]
async fn first_supported_ordering_term_wins(
    app: TestApp,
    #[case] uri: &str,
    #[case] expected: &[&str],
) {
    let member = user();
    app.seed(member, &[Level::Error, Level::Info]).await;

    let (status, body) = app.get_as(member, uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(texts(&body), expected);
}

#[rstest]
#[case("/messages/?page_size=3", 3)]
#[case("/messages/?page_size=50", 6)]
#[case("/messages/?page_size=none", 2)]
#[tokio::test(flavor = "multi_thread")]
async fn page_size_is_capped(#[case] uri: &str, #[case] expected: usize) {
    let app = TestApp::new(FlashSettings::default().with_page_sizes(2, 6));
    let member = user();
    app.seed(member, &[Level::Info; 8]).await;

    let (_, body) = app.get_as(member, uri).await;

    assert_eq!(texts(&body).len(), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn callers_without_identity_get_an_empty_page(app: TestApp) {
    app.seed(user(), &[Level::Info]).await;

    let (status, body) = app.send(anonymous("GET", "/messages/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "count": 0, "next": null, "previous": null, "results": [] })
    );
}
