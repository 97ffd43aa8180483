//! Shared test helpers for in-memory repository integration tests.

use flashbox::config::FlashSettings;
use flashbox::flash::{
    adapters::memory::InMemoryFlashRepository,
    domain::RequestIdentity,
    ports::FlashMessageRepository,
    services::FlashStorage,
};
use mockable::DefaultClock;
use rstest::fixture;
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a fresh in-memory repository for each test.
#[fixture]
pub fn repo() -> InMemoryFlashRepository {
    InMemoryFlashRepository::new()
}

/// Builds request storage over a clone of `repo`.
pub fn storage(
    repo: &InMemoryFlashRepository,
    settings: FlashSettings,
    identity: RequestIdentity,
) -> FlashStorage {
    FlashStorage::new(
        Arc::new(repo.clone()) as Arc<dyn FlashMessageRepository>,
        Arc::new(DefaultClock),
        Arc::new(settings),
        identity,
    )
}
