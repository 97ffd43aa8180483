//! Request lifecycle: host routes, cleanup and misconfiguration.

use crate::api::helpers::{TestApp, as_user, user};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header::COOKIE};
use axum::middleware::from_fn_with_state;
use axum::routing::post;
use flashbox::config::FlashSettings;
use flashbox::flash::{
    domain::{ExtraTags, Level},
    ports::MessageStorage,
};
use flashbox::http::{
    AppState, extract::RequestStorage, layers::install_storage, message_routes,
    router_with_read_cleanup,
};
use serde_json::json;

async fn save_profile(storage: RequestStorage) -> StatusCode {
    storage
        .add(Level::Success, "Profile updated.", ExtraTags::from("profile"))
        .await;
    StatusCode::NO_CONTENT
}

fn host_router(state: AppState) -> Router {
    Router::new()
        .route("/profile", post(save_profile))
        .merge(message_routes())
        .layer(from_fn_with_state(state.clone(), install_storage))
        .with_state(state)
}

fn with_cookie(method: &str, uri: &str, session: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(COOKIE, format!("theme=dark; sessionid={session}"))
        .body(Body::empty())
        .expect("valid request")
}

#[tokio::test(flavor = "multi_thread")]
async fn host_handlers_add_messages_for_the_next_request() {
    let app = TestApp::with_router(FlashSettings::default(), host_router);
    let member = user();

    let (status, _) = app.send(as_user(member, "POST", "/profile")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.get_as(member, "/messages/").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["message"], "Profile updated.");
    assert_eq!(body["results"][0]["level_tag"], "success");
    assert_eq!(body["results"][0]["extra_tags"], json!(["profile"]));
    assert_eq!(body["results"][0]["view"], "/profile");
}

#[tokio::test(flavor = "multi_thread")]
async fn session_mode_addresses_messages_by_cookie() {
    let app = TestApp::with_router(
        FlashSettings::default().with_use_sessions(true),
        host_router,
    );

    let (status, _) = app.send(with_cookie("POST", "/profile", "browser-a")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, other) = app
        .send(with_cookie("GET", "/messages/", "browser-b"))
        .await;
    assert_eq!(other["count"], 0);

    let (_, own) = app
        .send(with_cookie("GET", "/messages/", "browser-a"))
        .await;
    assert_eq!(own["count"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn routes_without_the_storage_layer_report_misconfiguration() {
    let app = TestApp::with_router(FlashSettings::default(), |state| {
        message_routes().with_state(state)
    });

    let (status, body) = app.get_as(user(), "/messages/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().expect("error message");
    assert!(message.contains("install_storage"), "{message}");
}

#[tokio::test(flavor = "multi_thread")]
async fn cleanup_router_deletes_read_messages_after_the_response() {
    let app = TestApp::with_router(FlashSettings::default(), router_with_read_cleanup);
    let member = user();
    app.seed(member, &[Level::Info, Level::Error]).await;

    let (status, body) = app.get_as(member, "/messages/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(app.repository.total().expect("total"), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_read_setting_removes_what_a_request_read() {
    let app = TestApp::new(FlashSettings::default().with_delete_read(true));
    let member = user();
    let ids = app.seed(member, &[Level::Info, Level::Info]).await;
    let id = ids.first().expect("seeded id").into_inner();

    let (status, _) = app.get_as(member, "/messages/peek/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.repository.total().expect("total"), 2);

    let (status, _) = app.get_as(member, &format!("/messages/{id}/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.repository.total().expect("total"), 1);

    let (status, _) = app.get_as(member, &format!("/messages/{id}/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
