//! axum integration: request storage middleware and the `/messages` API.
//!
//! [`router`] is the ready-made application: the message routes wrapped in
//! the storage layer. Hosts that serve their own routes as well mount
//! [`layers::install_storage`] around them with
//! `axum::middleware::from_fn_with_state` and merge [`message_routes`]; any
//! handler can then take [`extract::RequestStorage`] to add messages.

pub mod error;
pub mod extract;
pub mod filters;
pub mod handlers;
pub mod identity;
pub mod layers;
pub mod serializers;
pub mod state;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;

pub use error::ApiError;
pub use identity::{AuthenticatedUser, ViewName};
pub use state::AppState;

/// The `/messages` routes without any middleware.
///
/// Requests reaching these routes without the storage layer are answered
/// with a 500 explaining the misconfiguration.
#[must_use]
pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages/", get(handlers::list_messages))
        .route("/messages/peek/", get(handlers::peek_messages))
        .route(
            "/messages/{id}/",
            get(handlers::retrieve_message).delete(handlers::destroy_message),
        )
}

/// The message routes behind the storage layer.
#[must_use]
pub fn router(state: AppState) -> Router {
    message_routes()
        .layer(from_fn_with_state(state.clone(), layers::install_storage))
        .with_state(state)
}

/// Like [`router`], additionally deleting the caller's read messages after
/// every request.
#[must_use]
pub fn router_with_read_cleanup(state: AppState) -> Router {
    message_routes()
        .layer(from_fn_with_state(state.clone(), layers::clear_read_messages))
        .layer(from_fn_with_state(state.clone(), layers::install_storage))
        .with_state(state)
}
