//! Shared state injected into the message routes and middleware.

use crate::config::FlashSettings;
use crate::flash::{
    ports::SharedRepository,
    services::{MessageCatalog, SharedClock},
};
use std::fmt;
use std::sync::Arc;

/// State shared by every message handler and middleware.
#[derive(Clone)]
pub struct AppState {
    /// Message persistence.
    pub repository: SharedRepository,
    /// Time source for creation and read timestamps.
    pub clock: SharedClock,
    /// Storage and API behaviour.
    pub settings: Arc<FlashSettings>,
    /// REST operations over `repository`.
    pub catalog: MessageCatalog,
}

impl AppState {
    /// Builds the state and its catalog from shared parts.
    #[must_use]
    pub fn new(repository: SharedRepository, clock: SharedClock, settings: FlashSettings) -> Self {
        let shared = Arc::new(settings);
        let catalog = MessageCatalog::new(
            Arc::clone(&repository),
            Arc::clone(&clock),
            Arc::clone(&shared),
        );
        Self {
            repository,
            clock,
            settings: shared,
            catalog,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
