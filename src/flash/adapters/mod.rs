//! Persistence adapters for the flash module.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryFlashRepository`]: thread-safe in-memory storage
//! - [`postgres::PostgresFlashRepository`]: `PostgreSQL` persistence using
//!   Diesel ORM

pub mod memory;
pub mod postgres;
