//! Flashbox: database-backed flash messages for axum applications.
//!
//! Handlers add one-time notifications through a per-request
//! [`MessageStorage`](flash::ports::MessageStorage); the messages are stored
//! in `PostgreSQL` (or memory) against the caller's session or user, and a
//! small REST surface lets clients list, read, peek at and delete them.
//!
//! # Architecture
//!
//! Flashbox follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and storage
//! - **Adapters**: In-memory and Diesel/`PostgreSQL` repositories
//!
//! # Modules
//!
//! - [`flash`]: Message model, repositories and services
//! - [`http`]: axum middleware, extractors and REST routes
//! - [`config`]: Environment-driven settings

pub mod config;
pub mod flash;
pub mod http;
