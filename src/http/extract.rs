//! Extractor for the per-request message storage.

use crate::flash::services::FlashStorage;
use crate::http::error::ApiError;
use axum::extract::FromRequestParts;
use http::request::Parts;
use std::ops::Deref;
use std::sync::Arc;

/// The [`FlashStorage`] installed by
/// [`install_storage`](crate::http::layers::install_storage).
///
/// Host handlers take this extractor to add messages:
///
/// ```ignore
/// async fn save(storage: RequestStorage) -> StatusCode {
///     storage.add(Level::Success, "Saved.", ExtraTags::None).await;
///     StatusCode::NO_CONTENT
/// }
/// ```
///
/// Extraction fails with [`ApiError::Misconfigured`] when the storage layer
/// is missing from the router.
#[derive(Debug, Clone)]
pub struct RequestStorage(pub Arc<FlashStorage>);

impl<S> FromRequestParts<S> for RequestStorage
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Arc<FlashStorage>>()
            .cloned()
            .map(Self)
            .ok_or(ApiError::Misconfigured)
    }
}

impl Deref for RequestStorage {
    type Target = FlashStorage;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
