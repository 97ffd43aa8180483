//! `PostgreSQL` adapters for flash message persistence.
//!
//! Diesel calls run on the blocking thread pool; tags live in their own table
//! and are written in the same transaction as the message row.

mod models;
mod repository;
mod schema;

pub use repository::{FlashPgPool, PostgresFlashRepository};
