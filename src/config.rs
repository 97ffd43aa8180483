//! Configuration loaded from environment variables.
//!
//! Every field has a default, so nothing needs to be set for the crate to
//! work. [`FlashSettings`] drives storage and API behaviour;
//! [`ServerConfig`] is only read by the standalone server binary.

use crate::flash::domain::{FieldLimits, Level};
use std::str::FromStr;

/// Behaviour switches for flash message storage and the REST surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashSettings {
    /// Allow `DELETE /messages/{id}/` on messages that were never read.
    pub allow_delete_unread: bool,
    /// Delete read messages when a request that used the storage finishes.
    pub delete_read: bool,
    /// Address messages by session (`true`) or by authenticated user.
    pub use_sessions: bool,
    /// Messages below this level are dropped when added.
    pub min_level: Level,
    /// Maximum field lengths, never wider than the storage columns.
    pub limits: FieldLimits,
    /// Default page size for listings.
    pub page_size: u32,
    /// Upper bound for a client-requested page size.
    pub max_page_size: u32,
    /// Name of the cookie carrying the session key.
    pub session_cookie: String,
}

impl Default for FlashSettings {
    fn default() -> Self {
        Self {
            allow_delete_unread: false,
            delete_read: false,
            use_sessions: false,
            min_level: Level::Info,
            limits: FieldLimits::default(),
            page_size: 20,
            max_page_size: 100,
            session_cookie: "sessionid".to_owned(),
        }
    }
}

impl FlashSettings {
    /// Builds settings from `FLASHBOX_*` environment variables, falling back
    /// to defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            allow_delete_unread: flag_env(
                "FLASHBOX_ALLOW_DELETE_UNREAD",
                defaults.allow_delete_unread,
            ),
            delete_read: flag_env("FLASHBOX_DELETE_READ", defaults.delete_read),
            use_sessions: flag_env("FLASHBOX_USE_SESSIONS", defaults.use_sessions),
            min_level: Level::from_value(parse_env(
                "FLASHBOX_MIN_LEVEL",
                defaults.min_level.value(),
            )),
            limits: FieldLimits {
                view: parse_env("FLASHBOX_MAX_VIEW_LENGTH", defaults.limits.view),
                message: parse_env("FLASHBOX_MAX_MESSAGE_LENGTH", defaults.limits.message),
                tag: parse_env("FLASHBOX_MAX_TAG_LENGTH", defaults.limits.tag),
            }
            .clamped(),
            page_size: parse_env("FLASHBOX_PAGE_SIZE", defaults.page_size),
            max_page_size: parse_env("FLASHBOX_MAX_PAGE_SIZE", defaults.max_page_size),
            session_cookie: env_or("FLASHBOX_SESSION_COOKIE", &defaults.session_cookie),
        }
    }

    /// Sets whether unread messages may be deleted through the API.
    #[must_use]
    pub const fn with_allow_delete_unread(mut self, allow: bool) -> Self {
        self.allow_delete_unread = allow;
        self
    }

    /// Sets whether read messages are deleted at the end of a request.
    #[must_use]
    pub const fn with_delete_read(mut self, delete_read: bool) -> Self {
        self.delete_read = delete_read;
        self
    }

    /// Sets the addressing mode.
    #[must_use]
    pub const fn with_use_sessions(mut self, use_sessions: bool) -> Self {
        self.use_sessions = use_sessions;
        self
    }

    /// Sets the minimum stored level.
    #[must_use]
    pub const fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Sets the default and maximum page sizes.
    #[must_use]
    pub const fn with_page_sizes(mut self, page_size: u32, max_page_size: u32) -> Self {
        self.page_size = page_size;
        self.max_page_size = max_page_size;
        self
    }
}

/// Runtime configuration for the standalone server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP address to bind.
    pub bind_address: String,
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum pooled database connections.
    pub pool_size: u32,
    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,
    /// Emit log records as newline-delimited JSON.
    pub log_json: bool,
    /// Delete each caller's read messages after every request.
    pub clear_read_after_request: bool,
    /// Header an authenticating proxy sets to the caller's user UUID.
    pub trusted_user_header: Option<String>,
}

impl ServerConfig {
    /// Builds [`ServerConfig`] from environment variables, falling back to
    /// defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("FLASHBOX_BIND", "0.0.0.0:8080"),
            database_url: env_or(
                "FLASHBOX_DATABASE_URL",
                "postgres://postgres@localhost/flashbox",
            ),
            pool_size: parse_env("FLASHBOX_DB_POOL_SIZE", 8),
            log_level: env_or("FLASHBOX_LOG", "info"),
            log_json: flag_env("FLASHBOX_LOG_JSON", false),
            clear_read_after_request: flag_env("FLASHBOX_CLEAR_READ", false),
            trusted_user_header: std::env::var("FLASHBOX_USER_HEADER")
                .ok()
                .filter(|name| !name.trim().is_empty()),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

fn flag_env(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|value| parse_flag(&value))
        .unwrap_or(default)
}

/// Parses `1`/`0`, `true`/`false`, `yes`/`no` and `on`/`off`, ignoring case.
#[must_use]
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
