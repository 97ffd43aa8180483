//! Flash message storage.
//!
//! Short notifications ("saved", "permission denied") are attached to a
//! session or an authenticated user, survive across requests in a database
//! and are marked read the first time they are shown. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Request storage and REST operations in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
