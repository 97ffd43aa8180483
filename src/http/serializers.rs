//! JSON bodies returned by the message endpoints.

use crate::flash::domain::{FlashMessage, MessageId, UnreadSummary};
use chrono::{DateTime, Utc};
use http::Uri;
use serde::Serialize;

/// A message as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBody {
    /// Message identifier.
    pub id: MessageId,
    /// Message text.
    pub message: String,
    /// Numeric level.
    pub level: i32,
    /// Level name, empty for custom levels.
    pub level_tag: &'static str,
    /// Extra tags.
    pub extra_tags: Vec<String>,
    /// View the message was submitted from.
    pub view: String,
    /// When the message was first read, `null` if it had not been read
    /// before this response.
    pub read_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
}

impl From<&FlashMessage> for MessageBody {
    fn from(message: &FlashMessage) -> Self {
        Self {
            id: message.id(),
            message: message.text().to_owned(),
            level: message.level().value(),
            level_tag: message.level().tag(),
            extra_tags: message.tags().to_vec(),
            view: message.view().to_owned(),
            read_at: message.read_at(),
            created: message.created_at(),
        }
    }
}

/// Page-number paginated list body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageBody<T> {
    /// Matching items across all pages.
    pub count: u64,
    /// Link to the next page, if any.
    pub next: Option<String>,
    /// Link to the previous page, if any.
    pub previous: Option<String>,
    /// Items on this page.
    pub results: Vec<T>,
}

impl<T> PageBody<T> {
    /// Body for a caller with nothing to list.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// Unread summary returned by `GET /messages/peek/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeekBody {
    /// Number of unread messages.
    pub count: u64,
    /// Highest unread level, `null` when nothing is unread.
    pub max_level: Option<i32>,
    /// Tag of the highest unread level, `""` when nothing is unread.
    pub max_level_tag: &'static str,
}

impl From<UnreadSummary> for PeekBody {
    fn from(summary: UnreadSummary) -> Self {
        Self {
            count: summary.count,
            max_level: summary.max_level.map(|level| level.value()),
            max_level_tag: summary.max_level_tag(),
        }
    }
}

/// Builds the link to `page` by rewriting the `page` parameter of `uri`.
///
/// Page one is linked without a `page` parameter.
#[must_use]
pub fn page_link(uri: &Uri, page: u32) -> String {
    let mut pairs: Vec<String> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some("page"))
        .map(str::to_owned)
        .collect();
    if page > 1 {
        pairs.push(format!("page={page}"));
    }
    if pairs.is_empty() {
        uri.path().to_owned()
    } else {
        format!("{}?{}", uri.path(), pairs.join("&"))
    }
}
