//! Message storage contract consumed by request handlers.
//!
//! Handlers add notifications during a request; rendering code later reads
//! them back once. Implementations decide where messages live.

use crate::flash::domain::{ExtraTags, Level, Notice};
use crate::flash::ports::FlashRepositoryResult;
use async_trait::async_trait;

/// Per-request message storage.
#[async_trait]
pub trait MessageStorage: Send + Sync {
    /// Adds a message.
    ///
    /// Never fails: messages that cannot be kept are logged and dropped so a
    /// notification can never break the request that produced it.
    async fn add(&self, level: Level, text: &str, extra_tags: ExtraTags);

    /// Returns the pending messages and marks them read.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    async fn messages(&self) -> FlashRepositoryResult<Vec<Notice>>;

    /// Counts pending messages without reading them.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    async fn len(&self) -> FlashRepositoryResult<usize>;

    /// Returns whether no message is pending.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    async fn is_empty(&self) -> FlashRepositoryResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Returns whether a pending message has the notice's text and level.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    async fn contains(&self, notice: &Notice) -> FlashRepositoryResult<bool>;

    /// Finishes the request: runs any end-of-request housekeeping.
    ///
    /// # Errors
    ///
    /// Returns an error when housekeeping writes fail.
    async fn update(&self) -> FlashRepositoryResult<()>;
}
