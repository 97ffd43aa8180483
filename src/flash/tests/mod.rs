//! Unit tests for the flash message domain and services.


use crate::flash::domain::{
    FlashMessage, Level, MessageId, MessageOwner, PersistedFlashMessage, SessionKey, UserId,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

/// Fixed point in time offset by `minutes`.
fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
        .single()
        .expect("valid base timestamp")
        + Duration::minutes(minutes)
}

fn user() -> UserId {
    UserId::from_uuid(Uuid::new_v4())
}

fn session(key: &str) -> SessionKey {
    SessionKey::new(key).expect("valid session key")
}

/// Builds a stored message with explicit timestamps.
fn stored(
    owner: MessageOwner,
    level: Level,
    text: &str,
    created_minutes: i64,
    read_minutes: Option<i64>,
) -> FlashMessage {
    FlashMessage::from_persisted(PersistedFlashMessage {
        id: MessageId::new(),
        owner,
        view: String::new(),
        text: text.to_owned(),
        level,
        tags: Vec::new(),
        read_at: read_minutes.map(at),
        created_at: at(created_minutes),
    })
}
