//! Request lifecycle middleware.
//!
//! [`install_storage`] gives every request its own [`FlashStorage`] and runs
//! its end-of-request update. [`clear_read_messages`] optionally deletes the
//! caller's read messages once the response is ready. Mount the cleanup
//! layer inside the storage layer so it can see the request's scope.

use crate::flash::{ports::MessageStorage, services::FlashStorage};
use crate::http::identity::{request_identity, view_name};
use crate::http::state::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use tracing::{debug, error};

/// Installs a [`FlashStorage`] for the request and finalises it afterwards.
pub async fn install_storage(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = request_identity(
        request.headers(),
        request.extensions(),
        &state.settings.session_cookie,
    );
    let view = view_name(request.extensions());
    let storage = Arc::new(
        FlashStorage::new(
            Arc::clone(&state.repository),
            Arc::clone(&state.clock),
            Arc::clone(&state.settings),
            identity,
        )
        .with_view(view),
    );
    request.extensions_mut().insert(Arc::clone(&storage));

    let response = next.run(request).await;

    if let Err(err) = storage.update().await {
        error!(error = %err, "failed to finalise flash message storage");
    }
    response
}

/// Deletes the caller's read messages after the handler has run.
pub async fn clear_read_messages(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let storage = request.extensions().get::<Arc<FlashStorage>>().cloned();
    let response = next.run(request).await;

    let Some(scope) = storage.as_deref().and_then(FlashStorage::scope) else {
        return response;
    };
    match state.catalog.clear_read(scope).await {
        Ok(count) => debug!(count, "cleared read flash messages after request"),
        Err(err) => error!(error = %err, "failed to clear read flash messages"),
    }
    response
}
