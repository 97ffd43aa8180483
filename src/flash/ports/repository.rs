//! Repository port for scoped flash message persistence.

use crate::flash::domain::{
    FlashMessage, Level, MessageId, MessagePage, MessageQuery, MessageScope, PageRequest,
    ReadSelection, SessionKey, UnreadSummary, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for flash message repository operations.
pub type FlashRepositoryResult<T> = Result<T, FlashRepositoryError>;

/// Shared, type-erased repository handle.
pub type SharedRepository = Arc<dyn FlashMessageRepository>;

/// Flash message persistence contract.
///
/// Every read and bulk write takes the [`MessageScope`] of the caller; rows
/// outside that scope are invisible to the operation.
#[async_trait]
pub trait FlashMessageRepository: Send + Sync {
    /// Stores a new message together with its tags.
    ///
    /// # Errors
    ///
    /// Returns [`FlashRepositoryError::Persistence`] when the write fails.
    async fn store(&self, message: &FlashMessage) -> FlashRepositoryResult<()>;

    /// Finds a message by identifier within the scope.
    ///
    /// Returns `None` when the message does not exist or is out of scope.
    async fn find(
        &self,
        scope: &MessageScope,
        id: MessageId,
    ) -> FlashRepositoryResult<Option<FlashMessage>>;

    /// Lists messages matching `query`, paginated when `page` is given.
    async fn list(
        &self,
        scope: &MessageScope,
        query: &MessageQuery,
        page: Option<PageRequest>,
    ) -> FlashRepositoryResult<MessagePage>;

    /// Counts unread messages.
    async fn count_unread(&self, scope: &MessageScope) -> FlashRepositoryResult<u64>;

    /// Returns whether an unread message with this text and level exists.
    async fn contains_unread(
        &self,
        scope: &MessageScope,
        text: &str,
        level: Level,
    ) -> FlashRepositoryResult<bool>;

    /// Sets `read_at` on the selected unread messages and returns how many
    /// rows changed. Already-read rows are left untouched, so repeating the
    /// call changes nothing.
    async fn mark_read(
        &self,
        scope: &MessageScope,
        selection: &ReadSelection,
        at: DateTime<Utc>,
    ) -> FlashRepositoryResult<u64>;

    /// Deletes one message. Returns `false` when it was not in scope.
    async fn delete(&self, scope: &MessageScope, id: MessageId) -> FlashRepositoryResult<bool>;

    /// Deletes every read message and returns how many were removed.
    async fn delete_read(&self, scope: &MessageScope) -> FlashRepositoryResult<u64>;

    /// Counts unread messages and finds their highest level.
    async fn summarize_unread(&self, scope: &MessageScope) -> FlashRepositoryResult<UnreadSummary>;

    /// Deletes every message submitted in the session, regardless of user.
    async fn purge_session(&self, session_key: &SessionKey) -> FlashRepositoryResult<u64>;

    /// Deletes every message owned by the user.
    async fn purge_user(&self, user: UserId) -> FlashRepositoryResult<u64>;
}

/// Errors returned by flash message repository implementations.
#[derive(Debug, Clone, Error)]
pub enum FlashRepositoryError {
    /// A message with the same identifier already exists.
    #[error("duplicate message identifier: {0}")]
    Duplicate(MessageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FlashRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
