//! In-memory flash message repository for tests and single-process hosts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::flash::{
    domain::{
        FlashMessage, Level, MessageId, MessagePage, MessageQuery, MessageScope, PageRequest,
        ReadSelection, SessionKey, UnreadSummary, UserId,
    },
    ports::{FlashMessageRepository, FlashRepositoryError, FlashRepositoryResult},
};

/// Thread-safe in-memory flash message repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlashRepository {
    state: Arc<RwLock<InMemoryFlashState>>,
}

#[derive(Debug, Default)]
struct InMemoryFlashState {
    messages: HashMap<MessageId, FlashMessage>,
}

impl InMemoryFlashState {
    fn scoped<'a>(&'a self, scope: &'a MessageScope) -> impl Iterator<Item = &'a FlashMessage> {
        self.messages
            .values()
            .filter(move |message| scope.matches(message))
    }

    fn remove_where(&mut self, predicate: impl Fn(&FlashMessage) -> bool) -> u64 {
        let before = self.messages.len();
        self.messages.retain(|_, message| !predicate(message));
        (before - self.messages.len()) as u64
    }
}

impl InMemoryFlashRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored messages across every scope.
    ///
    /// # Errors
    ///
    /// Returns [`FlashRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn total(&self) -> FlashRepositoryResult<usize> {
        Ok(self.read()?.messages.len())
    }

    fn read(&self) -> FlashRepositoryResult<RwLockReadGuard<'_, InMemoryFlashState>> {
        self.state.read().map_err(|err| {
            FlashRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> FlashRepositoryResult<RwLockWriteGuard<'_, InMemoryFlashState>> {
        self.state.write().map_err(|err| {
            FlashRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl FlashMessageRepository for InMemoryFlashRepository {
    async fn store(&self, message: &FlashMessage) -> FlashRepositoryResult<()> {
        let mut state = self.write()?;
        if state.messages.contains_key(&message.id()) {
            return Err(FlashRepositoryError::Duplicate(message.id()));
        }
        state.messages.insert(message.id(), message.clone());
        Ok(())
    }

    async fn find(
        &self,
        scope: &MessageScope,
        id: MessageId,
    ) -> FlashRepositoryResult<Option<FlashMessage>> {
        let state = self.read()?;
        Ok(state
            .messages
            .get(&id)
            .filter(|message| scope.matches(message))
            .cloned())
    }

    async fn list(
        &self,
        scope: &MessageScope,
        query: &MessageQuery,
        page: Option<PageRequest>,
    ) -> FlashRepositoryResult<MessagePage> {
        let state = self.read()?;
        let mut matching: Vec<FlashMessage> = state
            .scoped(scope)
            .filter(|message| query.matches(message))
            .cloned()
            .collect();
        matching.sort_by(|left, right| query.ordering.compare(left, right));

        let total = matching.len() as u64;
        let items = match page {
            Some(request) => {
                let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
                let size = usize::try_from(request.size()).unwrap_or(usize::MAX);
                matching.into_iter().skip(offset).take(size).collect()
            }
            None => matching,
        };
        Ok(MessagePage { items, total })
    }

    async fn count_unread(&self, scope: &MessageScope) -> FlashRepositoryResult<u64> {
        let state = self.read()?;
        Ok(state.scoped(scope).filter(|message| !message.is_read()).count() as u64)
    }

    async fn contains_unread(
        &self,
        scope: &MessageScope,
        text: &str,
        level: Level,
    ) -> FlashRepositoryResult<bool> {
        let state = self.read()?;
        Ok(state.scoped(scope).any(|message| {
            !message.is_read() && message.text() == text && message.level() == level
        }))
    }

    async fn mark_read(
        &self,
        scope: &MessageScope,
        selection: &ReadSelection,
        at: DateTime<Utc>,
    ) -> FlashRepositoryResult<u64> {
        let mut state = self.write()?;
        let mut updated = 0;
        for message in state.messages.values_mut() {
            if scope.matches(message) && selection.includes(message.id()) && message.mark_read(at)
            {
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete(&self, scope: &MessageScope, id: MessageId) -> FlashRepositoryResult<bool> {
        let mut state = self.write()?;
        let in_scope = state
            .messages
            .get(&id)
            .is_some_and(|message| scope.matches(message));
        if in_scope {
            state.messages.remove(&id);
        }
        Ok(in_scope)
    }

    async fn delete_read(&self, scope: &MessageScope) -> FlashRepositoryResult<u64> {
        let mut state = self.write()?;
        Ok(state.remove_where(|message| scope.matches(message) && message.is_read()))
    }

    async fn summarize_unread(&self, scope: &MessageScope) -> FlashRepositoryResult<UnreadSummary> {
        let state = self.read()?;
        let summary = state
            .scoped(scope)
            .filter(|message| !message.is_read())
            .fold(UnreadSummary::default(), |acc, message| UnreadSummary {
                count: acc.count + 1,
                max_level: acc.max_level.max(Some(message.level())),
            });
        Ok(summary)
    }

    async fn purge_session(&self, session_key: &SessionKey) -> FlashRepositoryResult<u64> {
        let mut state = self.write()?;
        Ok(state.remove_where(|message| message.owner().session_key.as_ref() == Some(session_key)))
    }

    async fn purge_user(&self, user: UserId) -> FlashRepositoryResult<u64> {
        let mut state = self.write()?;
        Ok(state.remove_where(|message| message.owner().user == Some(user)))
    }
}
