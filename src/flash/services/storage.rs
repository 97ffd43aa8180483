//! Database-backed [`MessageStorage`] with an in-memory fallback queue.

use crate::config::FlashSettings;
use crate::flash::{
    domain::{
        ExtraTags, FlashMessage, Level, MessageDraft, MessageOwner, MessageQuery, MessageScope,
        Notice, ReadSelection, RequestIdentity,
    },
    ports::{FlashRepositoryResult, MessageStorage, SharedRepository},
    services::SharedClock,
};
use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

/// Per-request message storage bound to one caller identity.
///
/// Messages are written straight to the repository when added. When the
/// identity resolves to no [`MessageScope`] (no session in session mode, no
/// user in user mode) they are queued in memory instead and handed back on
/// the next read from this same storage object.
pub struct FlashStorage {
    repository: SharedRepository,
    clock: SharedClock,
    settings: Arc<FlashSettings>,
    identity: RequestIdentity,
    scope: Option<MessageScope>,
    view: String,
    fallback: Mutex<Vec<Notice>>,
    used: AtomicBool,
    added_new: AtomicBool,
}

impl FlashStorage {
    /// Creates a storage object for one request.
    #[must_use]
    pub fn new(
        repository: SharedRepository,
        clock: SharedClock,
        settings: Arc<FlashSettings>,
        identity: RequestIdentity,
    ) -> Self {
        let scope = MessageScope::resolve(&identity, settings.use_sessions);
        Self {
            repository,
            clock,
            settings,
            identity,
            scope,
            view: String::new(),
            fallback: Mutex::new(Vec::new()),
            used: AtomicBool::new(false),
            added_new: AtomicBool::new(false),
        }
    }

    /// Sets the name of the view handling the request.
    #[must_use]
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    /// Returns the caller identity.
    #[must_use]
    pub const fn identity(&self) -> &RequestIdentity {
        &self.identity
    }

    /// Returns the resolved scope, or `None` for callers that can only use
    /// the fallback queue.
    #[must_use]
    pub const fn scope(&self) -> Option<&MessageScope> {
        self.scope.as_ref()
    }

    /// Returns the view name recorded on new messages.
    #[must_use]
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Returns whether messages were read through this storage.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::Relaxed)
    }

    /// Records that messages were read during this request by another path
    /// (such as the REST listing), so end-of-request cleanup runs.
    pub fn mark_used(&self) {
        self.used.store(true, Ordering::Relaxed);
    }

    /// Returns whether a message was persisted during this request.
    #[must_use]
    pub fn added_new(&self) -> bool {
        self.added_new.load(Ordering::Relaxed)
    }

    /// Returns how many messages are waiting in the fallback queue.
    #[must_use]
    pub fn fallback_len(&self) -> usize {
        self.fallback_queue().len()
    }

    fn fallback_queue(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.fallback.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn drain_fallback(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.fallback_queue())
    }

    fn owner(&self) -> MessageOwner {
        MessageOwner::from_identity(&self.identity)
    }
}

impl fmt::Debug for FlashStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashStorage")
            .field("scope", &self.scope)
            .field("view", &self.view)
            .field("fallback", &self.fallback_len())
            .field("used", &self.is_used())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessageStorage for FlashStorage {
    async fn add(&self, level: Level, text: &str, extra_tags: ExtraTags) {
        if text.is_empty() {
            debug!(view = %self.view, "skipping flash message with empty text");
            return;
        }
        if level < self.settings.min_level {
            debug!(
                level = level.value(),
                min_level = self.settings.min_level.value(),
                "skipping flash message below the minimum level"
            );
            return;
        }
        if self.scope.is_none() {
            warn!(
                view = %self.view,
                use_sessions = self.settings.use_sessions,
                "no session or user on the request; keeping flash message in memory"
            );
            self.fallback_queue()
                .push(Notice::new(level, text).with_tags(extra_tags));
            return;
        }

        let draft = MessageDraft::new(self.owner(), level, text)
            .with_view(self.view.clone())
            .with_tags(extra_tags);
        let message = match FlashMessage::new(draft, &self.settings.limits, &*self.clock) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, view = %self.view, "skipping invalid flash message");
                return;
            }
        };
        if let Err(err) = self.repository.store(&message).await {
            error!(error = %err, message_id = %message.id(), "failed to store flash message");
            return;
        }
        self.added_new.store(true, Ordering::Relaxed);
    }

    async fn messages(&self) -> FlashRepositoryResult<Vec<Notice>> {
        let mut notices = self.drain_fallback();
        if let Some(scope) = &self.scope {
            let page = self
                .repository
                .list(scope, &MessageQuery::unread(), None)
                .await?;
            notices.extend(page.items.iter().map(Notice::from));
            let marked = self
                .repository
                .mark_read(scope, &ReadSelection::Only(page.ids()), self.clock.utc())
                .await?;
            debug!(count = marked, "marked flash messages read");
        }
        self.mark_used();
        Ok(notices)
    }

    async fn len(&self) -> FlashRepositoryResult<usize> {
        let pending = self.fallback_len();
        let Some(scope) = &self.scope else {
            return Ok(pending);
        };
        let stored = self.repository.count_unread(scope).await?;
        Ok(pending.saturating_add(usize::try_from(stored).unwrap_or(usize::MAX)))
    }

    async fn contains(&self, notice: &Notice) -> FlashRepositoryResult<bool> {
        let queued = self
            .fallback_queue()
            .iter()
            .any(|pending| pending.text == notice.text && pending.level == notice.level);
        if queued {
            return Ok(true);
        }
        let Some(scope) = &self.scope else {
            return Ok(false);
        };
        self.repository
            .contains_unread(scope, &notice.text, notice.level)
            .await
    }

    async fn update(&self) -> FlashRepositoryResult<()> {
        if !self.settings.delete_read || !self.is_used() {
            return Ok(());
        }
        let Some(scope) = &self.scope else {
            return Ok(());
        };
        let count = self.repository.delete_read(scope).await?;
        info!(count, scope = ?scope, "cleared read flash messages");
        Ok(())
    }
}
