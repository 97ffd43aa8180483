//! Operations behind the message REST endpoints and host integration hooks.

use crate::config::FlashSettings;
use crate::flash::{
    domain::{
        ExtraTags, FlashDomainError, FlashMessage, Level, MessageDraft, MessageId, MessageOwner,
        MessagePage, MessageQuery, MessageScope, PageRequest, ReadSelection, SessionKey,
        UnreadSummary, UserId,
    },
    ports::{FlashRepositoryError, SharedRepository},
    services::SharedClock,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for message catalog operations.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// A new message failed validation.
    #[error(transparent)]
    Domain(#[from] FlashDomainError),

    /// The repository failed.
    #[error(transparent)]
    Repository(#[from] FlashRepositoryError),

    /// No message with this identifier exists in the caller's scope.
    #[error("message not found: {0}")]
    NotFound(MessageId),

    /// The message is unread and unread deletion is disabled.
    #[error("message {0} has not been read yet")]
    DeleteUnread(MessageId),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Value returned by a reading operation together with how many messages the
/// read marked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered<T> {
    /// What was read, as it was before marking.
    pub value: T,
    /// Messages whose `read_at` was set by this read.
    pub marked_read: u64,
}

/// Scoped list, retrieve, delete and peek operations over a repository.
#[derive(Clone)]
pub struct MessageCatalog {
    repository: SharedRepository,
    clock: SharedClock,
    settings: Arc<FlashSettings>,
}

impl MessageCatalog {
    /// Creates a catalog.
    #[must_use]
    pub const fn new(
        repository: SharedRepository,
        clock: SharedClock,
        settings: Arc<FlashSettings>,
    ) -> Self {
        Self {
            repository,
            clock,
            settings,
        }
    }

    /// Returns the settings the catalog enforces.
    #[must_use]
    pub fn settings(&self) -> &FlashSettings {
        &self.settings
    }

    /// Lists one page of messages and marks exactly that page read.
    ///
    /// The returned messages keep the `read_at` they had when selected.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] when the repository fails.
    pub async fn list(
        &self,
        scope: &MessageScope,
        query: &MessageQuery,
        page: PageRequest,
    ) -> CatalogResult<Delivered<MessagePage>> {
        let listed = self.repository.list(scope, query, Some(page)).await?;
        let marked_read = if listed.items.iter().any(|message| !message.is_read()) {
            self.repository
                .mark_read(scope, &ReadSelection::Only(listed.ids()), self.clock.utc())
                .await?
        } else {
            0
        };
        debug!(
            page = page.number(),
            returned = listed.items.len(),
            total = listed.total,
            marked_read,
            "listed flash messages"
        );
        Ok(Delivered {
            value: listed,
            marked_read,
        })
    }

    /// Fetches one message and marks it read.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the message is not in scope.
    pub async fn retrieve(
        &self,
        scope: &MessageScope,
        id: MessageId,
    ) -> CatalogResult<Delivered<FlashMessage>> {
        let message = self
            .repository
            .find(scope, id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;
        let marked_read = if message.is_read() {
            0
        } else {
            self.repository
                .mark_read(scope, &ReadSelection::Only(vec![id]), self.clock.utc())
                .await?
        };
        Ok(Delivered {
            value: message,
            marked_read,
        })
    }

    /// Deletes one message.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the message is not in scope,
    /// or [`CatalogError::DeleteUnread`] when it is unread and the settings
    /// forbid deleting unread messages.
    pub async fn destroy(&self, scope: &MessageScope, id: MessageId) -> CatalogResult<()> {
        let message = self
            .repository
            .find(scope, id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;
        if !message.is_read() && !self.settings.allow_delete_unread {
            return Err(CatalogError::DeleteUnread(id));
        }
        if !self.repository.delete(scope, id).await? {
            return Err(CatalogError::NotFound(id));
        }
        debug!(message_id = %id, "deleted flash message");
        Ok(())
    }

    /// Summarises unread messages without marking anything read.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] when the repository fails.
    pub async fn peek(&self, scope: &MessageScope) -> CatalogResult<UnreadSummary> {
        Ok(self.repository.summarize_unread(scope).await?)
    }

    /// Marks every unread message in scope read.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] when the repository fails.
    pub async fn mark_all_read(&self, scope: &MessageScope) -> CatalogResult<u64> {
        Ok(self
            .repository
            .mark_read(scope, &ReadSelection::AllUnread, self.clock.utc())
            .await?)
    }

    /// Deletes every read message in scope.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] when the repository fails.
    pub async fn clear_read(&self, scope: &MessageScope) -> CatalogResult<u64> {
        Ok(self.repository.delete_read(scope).await?)
    }

    /// Stores a message for a user outside any request, e.g. from a
    /// background job. The message carries no session and no view.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Domain`] when the message is invalid.
    pub async fn create_user_message(
        &self,
        user: UserId,
        level: Level,
        text: &str,
        extra_tags: impl Into<ExtraTags> + Send,
    ) -> CatalogResult<FlashMessage> {
        let draft = MessageDraft::new(MessageOwner::user(user), level, text).with_tags(extra_tags);
        let message = FlashMessage::new(draft, &self.settings.limits, &*self.clock)?;
        self.repository.store(&message).await?;
        info!(user = %user, message_id = %message.id(), "stored user flash message");
        Ok(message)
    }

    /// Removes every message submitted in a session that has ended.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] when the repository fails.
    pub async fn end_session(&self, session_key: &SessionKey) -> CatalogResult<u64> {
        let count = self.repository.purge_session(session_key).await?;
        info!(count, "removed flash messages of ended session");
        Ok(count)
    }

    /// Removes every message owned by a deleted user.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] when the repository fails.
    pub async fn remove_user(&self, user: UserId) -> CatalogResult<u64> {
        let count = self.repository.purge_user(user).await?;
        info!(user = %user, count, "removed flash messages of deleted user");
        Ok(count)
    }
}

impl fmt::Debug for MessageCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageCatalog")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
