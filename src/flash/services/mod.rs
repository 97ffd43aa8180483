//! Application services for flash messages.

mod catalog;
mod storage;

pub use catalog::{CatalogError, CatalogResult, Delivered, MessageCatalog};
pub use storage::FlashStorage;

use mockable::Clock;
use std::sync::Arc;

/// Shared, type-erased clock handle.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;
