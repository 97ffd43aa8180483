//! Port contracts for flash message storage.
//!
//! Ports define infrastructure-agnostic interfaces used by the services and
//! the HTTP layer.

pub mod repository;
pub mod storage;

pub use repository::{
    FlashMessageRepository, FlashRepositoryError, FlashRepositoryResult, SharedRepository,
};
pub use storage::MessageStorage;
