//! Handlers for the `/messages` endpoints.

use crate::flash::domain::{MessageId, MessageScope, UnreadSummary};
use crate::http::{
    error::ApiError,
    extract::RequestStorage,
    filters::ListParams,
    serializers::{MessageBody, PageBody, PeekBody, page_link},
    state::AppState,
};
use axum::Json;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

/// `GET /messages/`: one page of the caller's messages.
///
/// Marks the returned messages read; the body shows them as they were
/// before marking.
///
/// # Errors
///
/// Returns [`ApiError`] for malformed filters, an out-of-range page or a
/// repository failure.
pub async fn list_messages(
    State(state): State<AppState>,
    storage: RequestStorage,
    OriginalUri(uri): OriginalUri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PageBody<MessageBody>>, ApiError> {
    let request = pairs
        .into_iter()
        .collect::<ListParams>()
        .parse(&state.settings)?;
    let Some(scope) = storage.scope() else {
        return Ok(Json(PageBody::empty()));
    };

    let delivered = state
        .catalog
        .list(scope, &request.query, request.page)
        .await?;
    let page = delivered.value;
    if page.items.is_empty() && request.page.number() > 1 {
        return Err(ApiError::NotFound("Invalid page.".to_owned()));
    }
    if delivered.marked_read > 0 {
        storage.mark_used();
    }

    let shown = request
        .page
        .offset()
        .saturating_add(u64::try_from(page.items.len()).unwrap_or(u64::MAX));
    let number = request.page.number();
    Ok(Json(PageBody {
        count: page.total,
        next: (shown < page.total).then(|| page_link(&uri, number.saturating_add(1))),
        previous: (number > 1).then(|| page_link(&uri, number - 1)),
        results: page.items.iter().map(MessageBody::from).collect(),
    }))
}

/// `GET /messages/{id}/`: one message, marked read.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the message is not visible to the
/// caller.
pub async fn retrieve_message(
    State(state): State<AppState>,
    storage: RequestStorage,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let (scope, message_id) = lookup(&storage, &id)?;
    let delivered = state.catalog.retrieve(scope, message_id).await?;
    if delivered.marked_read > 0 {
        storage.mark_used();
    }
    Ok(Json(MessageBody::from(&delivered.value)))
}

/// `DELETE /messages/{id}/`.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the message is not visible to the
/// caller and [`ApiError::Forbidden`] when it is unread and unread deletion
/// is disabled.
pub async fn destroy_message(
    State(state): State<AppState>,
    storage: RequestStorage,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let (scope, message_id) = lookup(&storage, &id)?;
    state.catalog.destroy(scope, message_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /messages/peek/`: unread count and highest level, without reading.
///
/// # Errors
///
/// Returns [`ApiError::Repository`] when the repository fails.
pub async fn peek_messages(
    State(state): State<AppState>,
    storage: RequestStorage,
) -> Result<Json<PeekBody>, ApiError> {
    let Some(scope) = storage.scope() else {
        return Ok(Json(PeekBody::from(UnreadSummary::default())));
    };
    let summary = state.catalog.peek(scope).await?;
    Ok(Json(PeekBody::from(summary)))
}

fn lookup<'a>(
    storage: &'a RequestStorage,
    raw_id: &str,
) -> Result<(&'a MessageScope, MessageId), ApiError> {
    let not_found = || ApiError::NotFound("Not found.".to_owned());
    let scope = storage.scope().ok_or_else(not_found)?;
    let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
    Ok((scope, MessageId::from_uuid(id)))
}
