//! `GET`/`DELETE /messages/{id}/` and `GET /messages/peek/`.

use crate::api::helpers::{TestApp, anonymous, user};
use axum::http::StatusCode;
use flashbox::config::FlashSettings;
use flashbox::flash::domain::{Level, MessageId};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn app() -> TestApp {
    TestApp::new(FlashSettings::default())
}

fn detail(id: MessageId) -> String {
    format!("/messages/{}/", id.into_inner())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retrieve_returns_the_message_and_marks_it_read(app: TestApp) {
    let member = user();
    let ids = app.seed(member, &[Level::Warning]).await;
    let id = *ids.first().expect("seeded id");

    let (status, body) = app.get_as(member, &detail(id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.into_inner().to_string());
    assert_eq!(body["message"], "message 0");
    assert_eq!(body["level_tag"], "warning");
    assert_eq!(body["extra_tags"], json!(["attention"]));
    assert_eq!(body["read_at"], Value::Null);

    let (_, again) = app.get_as(member, &detail(id)).await;
    assert!(again["read_at"].is_string());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn other_callers_cannot_see_the_message(app: TestApp) {
    let ids = app.seed(user(), &[Level::Info]).await;
    let id = *ids.first().expect("seeded id");

    let (status, body) = app.get_as(user(), &detail(id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found." }));

    let (status, _) = app.send(anonymous("GET", &detail(id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_identifiers_are_not_found(app: TestApp) {
    let (status, _) = app.get_as(user(), "/messages/42/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unread_messages_cannot_be_deleted(app: TestApp) {
    let member = user();
    let ids = app.seed(member, &[Level::Info]).await;
    let id = *ids.first().expect("seeded id");

    let (status, body) = app.delete_as(member, &detail(id)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "You do not have the permission to delete unread messages"
    );
    assert_eq!(app.repository.total().expect("total"), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn read_messages_are_deleted_once(app: TestApp) {
    let member = user();
    let ids = app.seed(member, &[Level::Info]).await;
    let id = *ids.first().expect("seeded id");
    app.get_as(member, &detail(id)).await;

    let (status, body) = app.delete_as(member, &detail(id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = app.delete_as(member, &detail(id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn unread_deletion_can_be_enabled() {
    let app = TestApp::new(FlashSettings::default().with_allow_delete_unread(true));
    let member = user();
    let ids = app.seed(member, &[Level::Info]).await;
    let id = *ids.first().expect("seeded id");

    let (status, _) = app.delete_as(member, &detail(id)).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.repository.total().expect("total"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn peek_summarises_without_reading(app: TestApp) {
    let member = user();
    app.seed(member, &[Level::Info, Level::Warning]).await;

    let (status, body) = app.get_as(member, "/messages/peek/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "count": 2, "max_level": 30, "max_level_tag": "warning" })
    );

    let (_, again) = app.get_as(member, "/messages/peek/").await;
    assert_eq!(again["count"], 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn peek_with_nothing_unread(app: TestApp) {
    let (status, body) = app.send(anonymous("GET", "/messages/peek/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "count": 0, "max_level": null, "max_level_tag": "" })
    );
}
