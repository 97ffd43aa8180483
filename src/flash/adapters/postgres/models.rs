//! Diesel row models for flash message persistence.

use super::schema::{flash_message_tags, flash_messages};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for flash messages.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = flash_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub user_id: Option<uuid::Uuid>,
    /// Originating session.
    pub session_key: Option<String>,
    /// Originating view.
    pub view: String,
    /// Message text.
    pub message: String,
    /// Numeric severity.
    pub level: i32,
    /// Read timestamp.
    pub read_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for flash messages.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = flash_messages)]
pub struct NewMessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub user_id: Option<uuid::Uuid>,
    /// Originating session.
    pub session_key: Option<String>,
    /// Originating view.
    pub view: String,
    /// Message text.
    pub message: String,
    /// Numeric severity.
    pub level: i32,
    /// Read timestamp.
    pub read_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for message tags.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = flash_message_tags)]
pub struct NewTagRow {
    /// Tagged message.
    pub message_id: uuid::Uuid,
    /// Tag text.
    pub text: String,
}
