//! Flash message aggregate and the values used to create it.

use super::{FlashDomainError, Level, MessageId, MessageOwner};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Maximum field lengths enforced before a message is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    /// Maximum length of the originating view name.
    pub view: usize,
    /// Maximum length of the message text.
    pub message: usize,
    /// Maximum length of a single extra tag.
    pub tag: usize,
}

impl FieldLimits {
    /// Widths of the storage columns; configured limits never exceed them.
    pub const COLUMN_WIDTHS: Self = Self {
        view: 64,
        message: 1024,
        tag: 128,
    };

    /// Caps every limit at its column width.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            view: self.view.min(Self::COLUMN_WIDTHS.view),
            message: self.message.min(Self::COLUMN_WIDTHS.message),
            tag: self.tag.min(Self::COLUMN_WIDTHS.tag),
        }
    }
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self::COLUMN_WIDTHS
    }
}

/// Extra tags supplied when adding a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtraTags {
    /// No tags.
    #[default]
    None,
    /// A single tag.
    Single(String),
    /// A set of tags inserted in bulk.
    Many(Vec<String>),
}

impl ExtraTags {
    /// Flattens the tags into a list, dropping blank entries.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        let tags = match self {
            Self::None => Vec::new(),
            Self::Single(tag) => vec![tag],
            Self::Many(tags) => tags,
        };
        tags.into_iter()
            .filter(|tag| !tag.trim().is_empty())
            .collect()
    }
}

impl From<&str> for ExtraTags {
    fn from(tag: &str) -> Self {
        Self::Single(tag.to_owned())
    }
}

impl From<String> for ExtraTags {
    fn from(tag: String) -> Self {
        Self::Single(tag)
    }
}

impl From<Vec<String>> for ExtraTags {
    fn from(tags: Vec<String>) -> Self {
        Self::Many(tags)
    }
}

impl<const N: usize> From<[&str; N]> for ExtraTags {
    fn from(tags: [&str; N]) -> Self {
        Self::Many(tags.into_iter().map(str::to_owned).collect())
    }
}

/// A message as handed back to rendering code: level, text and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub level: Level,
    /// Message text.
    pub text: String,
    /// Extra tags.
    pub extra_tags: Vec<String>,
}

impl Notice {
    /// Creates a notice without tags.
    #[must_use]
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            extra_tags: Vec::new(),
        }
    }

    /// Sets the extra tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<ExtraTags>) -> Self {
        self.extra_tags = tags.into().into_vec();
        self
    }
}

impl From<&FlashMessage> for Notice {
    fn from(message: &FlashMessage) -> Self {
        Self {
            level: message.level(),
            text: message.text().to_owned(),
            extra_tags: message.tags().to_vec(),
        }
    }
}

/// Unvalidated input for a new message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    owner: MessageOwner,
    level: Level,
    text: String,
    view: String,
    tags: Vec<String>,
}

impl MessageDraft {
    /// Creates a draft with the required fields.
    #[must_use]
    pub fn new(owner: MessageOwner, level: Level, text: impl Into<String>) -> Self {
        Self {
            owner,
            level,
            text: text.into(),
            view: String::new(),
            tags: Vec::new(),
        }
    }

    /// Sets the name of the view the message was submitted from.
    #[must_use]
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    /// Sets the extra tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<ExtraTags>) -> Self {
        self.tags = tags.into().into_vec();
        self
    }
}

/// Flash message aggregate: the stored row together with its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    id: MessageId,
    owner: MessageOwner,
    view: String,
    text: String,
    level: Level,
    tags: Vec<String>,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFlashMessage {
    /// Persisted identifier.
    pub id: MessageId,
    /// Persisted addressing.
    pub owner: MessageOwner,
    /// Persisted view name.
    pub view: String,
    /// Persisted text.
    pub text: String,
    /// Persisted severity.
    pub level: Level,
    /// Persisted extra tags.
    pub tags: Vec<String>,
    /// Persisted read timestamp.
    pub read_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl FlashMessage {
    /// Validates a draft and creates an unread message stamped with the
    /// clock's current time.
    ///
    /// # Errors
    ///
    /// Returns [`FlashDomainError::EmptyText`] for an empty body and
    /// [`FlashDomainError::FieldTooLong`] when any field exceeds `limits`.
    pub fn new(
        draft: MessageDraft,
        limits: &FieldLimits,
        clock: &(impl Clock + ?Sized),
    ) -> Result<Self, FlashDomainError> {
        let MessageDraft {
            owner,
            level,
            text,
            view,
            tags,
        } = draft;

        if text.is_empty() {
            return Err(FlashDomainError::EmptyText);
        }
        check_length("message", &text, limits.message)?;
        check_length("view", &view, limits.view)?;
        for tag in &tags {
            check_length("tag", tag, limits.tag)?;
        }

        Ok(Self {
            id: MessageId::new(),
            owner,
            view,
            text,
            level,
            tags,
            read_at: None,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedFlashMessage) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            view: data.view,
            text: data.text,
            level: data.level,
            tags: data.tags,
            read_at: data.read_at,
            created_at: data.created_at,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the addressing recorded on the message.
    #[must_use]
    pub const fn owner(&self) -> &MessageOwner {
        &self.owner
    }

    /// Returns the originating view name (may be empty).
    #[must_use]
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Returns the message text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the severity.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Returns the extra tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns when the message was read, if it has been.
    #[must_use]
    pub const fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether the message has been read.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Marks the message read at `at`.
    ///
    /// Returns `false` without touching the timestamp when it was already
    /// read.
    pub const fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.read_at.is_some() {
            return false;
        }
        self.read_at = Some(at);
        true
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), FlashDomainError> {
    let length = value.chars().count();
    if length > max {
        return Err(FlashDomainError::FieldTooLong { field, length, max });
    }
    Ok(())
}
