//! Filters, ordering, pagination and aggregate values for message queries.

use super::{FlashMessage, Level, MessageId, ParseOrderingError};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Inclusive timestamp range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    /// Lower bound (inclusive).
    pub after: Option<DateTime<Utc>>,
    /// Upper bound (inclusive).
    pub before: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Returns whether the range has no bounds.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.after.is_none() && self.before.is_none()
    }

    /// Returns whether `value` lies within the range.
    ///
    /// A missing value only matches an open range.
    #[must_use]
    pub fn contains(&self, value: Option<DateTime<Utc>>) -> bool {
        if self.is_open() {
            return true;
        }
        value.is_some_and(|at| {
            self.after.is_none_or(|after| at >= after)
                && self.before.is_none_or(|before| at <= before)
        })
    }
}

/// Column a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    /// Severity.
    Level,
    /// Read timestamp.
    ReadAt,
    /// Creation timestamp.
    Created,
}

/// Ordering applied to listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageOrdering {
    /// Unread messages first, then newest first.
    #[default]
    UnreadFirst,
    /// Explicit ordering by a field, ties broken newest first.
    By {
        /// Field to order by.
        field: OrderField,
        /// Whether to order descending.
        descending: bool,
    },
}

impl MessageOrdering {
    /// Parses `level`, `read_at` or `created`, optionally prefixed with `-`
    /// for descending order.
    ///
    /// # Errors
    ///
    /// Returns [`ParseOrderingError`] for any other field name.
    pub fn parse(value: &str) -> Result<Self, ParseOrderingError> {
        let trimmed = value.trim();
        let (descending, name) = trimmed
            .strip_prefix('-')
            .map_or((false, trimmed), |rest| (true, rest));
        let field = match name {
            "level" => OrderField::Level,
            "read_at" => OrderField::ReadAt,
            "created" => OrderField::Created,
            _ => return Err(ParseOrderingError(value.to_owned())),
        };
        Ok(Self::By { field, descending })
    }

    /// Compares two messages under this ordering.
    #[must_use]
    pub fn compare(self, left: &FlashMessage, right: &FlashMessage) -> Ordering {
        let newest_first = right
            .created_at()
            .cmp(&left.created_at())
            .then_with(|| right.id().cmp(&left.id()));
        match self {
            Self::UnreadFirst => left
                .is_read()
                .cmp(&right.is_read())
                .then(newest_first),
            Self::By { field, descending } => {
                let primary = match field {
                    OrderField::Level => left.level().cmp(&right.level()),
                    OrderField::ReadAt => compare_nulls_last(left.read_at(), right.read_at()),
                    OrderField::Created => left.created_at().cmp(&right.created_at()),
                };
                let directed = if descending {
                    primary.reverse()
                } else {
                    primary
                };
                directed.then(newest_first)
            }
        }
    }
}

/// Orders present values ascending and missing ones after them, matching
/// `PostgreSQL`'s default `NULLS LAST` for ascending sorts.
fn compare_nulls_last(left: Option<DateTime<Utc>>, right: Option<DateTime<Utc>>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => l.cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter set for listing messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQuery {
    /// Only unread (`true`) or only read (`false`) messages.
    pub unread: Option<bool>,
    /// Only messages carrying this extra tag.
    pub extra_tag: Option<String>,
    /// Only messages with exactly this level.
    pub level: Option<Level>,
    /// Only messages at or above this level.
    pub min_level: Option<Level>,
    /// Only messages submitted from this view.
    pub view: Option<String>,
    /// Read timestamp range.
    pub read: TimeRange,
    /// Creation timestamp range.
    pub created: TimeRange,
    /// Case-insensitive substring of the text.
    pub search: Option<String>,
    /// Result ordering.
    pub ordering: MessageOrdering,
}

impl MessageQuery {
    /// Query for every unread message in default order.
    #[must_use]
    pub fn unread() -> Self {
        Self {
            unread: Some(true),
            ..Self::default()
        }
    }

    /// Returns whether a message passes every filter.
    #[must_use]
    pub fn matches(&self, message: &FlashMessage) -> bool {
        self.unread.is_none_or(|unread| message.is_read() != unread)
            && self
                .extra_tag
                .as_ref()
                .is_none_or(|tag| message.tags().iter().any(|t| t == tag))
            && self.level.is_none_or(|level| message.level() == level)
            && self.min_level.is_none_or(|level| message.level() >= level)
            && self.view.as_ref().is_none_or(|view| message.view() == view)
            && self.read.contains(message.read_at())
            && self.created.contains(Some(message.created_at()))
            && self.search.as_ref().is_none_or(|needle| {
                message
                    .text()
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            })
    }
}

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

impl PageRequest {
    /// Creates a page request; zero values are raised to one.
    #[must_use]
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns the page size.
    #[must_use]
    pub const fn size(self) -> u32 {
        self.size
    }

    /// Returns the number of rows to skip.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }
}

/// One page of messages together with the unpaginated total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePage {
    /// Messages on this page.
    pub items: Vec<FlashMessage>,
    /// Number of messages matching the query across all pages.
    pub total: u64,
}

impl MessagePage {
    /// Returns the identifiers of the messages on this page.
    #[must_use]
    pub fn ids(&self) -> Vec<MessageId> {
        self.items.iter().map(FlashMessage::id).collect()
    }
}

/// Which unread messages a bulk read update touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadSelection {
    /// Every unread message in scope.
    AllUnread,
    /// Only the listed messages, when unread and in scope.
    Only(Vec<MessageId>),
}

impl ReadSelection {
    /// Returns whether the selection includes the message.
    #[must_use]
    pub fn includes(&self, id: MessageId) -> bool {
        match self {
            Self::AllUnread => true,
            Self::Only(ids) => ids.contains(&id),
        }
    }
}

/// Aggregate over unread messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnreadSummary {
    /// Number of unread messages.
    pub count: u64,
    /// Highest unread severity, if any message is unread.
    pub max_level: Option<Level>,
}

impl UnreadSummary {
    /// Returns the tag of the highest unread level, or `""`.
    #[must_use]
    pub fn max_level_tag(&self) -> &'static str {
        self.max_level.map_or("", Level::tag)
    }
}
