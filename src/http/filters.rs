//! Query-string filters and pagination for `GET /messages/`.

use crate::config::FlashSettings;
use crate::config::parse_flag;
use crate::flash::domain::{Level, MessageOrdering, MessageQuery, PageRequest, TimeRange};
use crate::http::error::ApiError;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Raw query parameters accepted by the listing endpoint.
///
/// Everything is kept as text so malformed values produce a JSON 400 rather
/// than an extractor rejection. Empty values are treated as absent, and a
/// repeated parameter keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// One-based page number.
    pub page: Option<String>,
    /// Requested page size, capped by the configured maximum.
    pub page_size: Option<String>,
    /// `true` for unread messages only, `false` for read ones only.
    pub unread: Option<String>,
    /// Tag text a message must carry.
    pub extra_tags: Option<String>,
    /// Exact numeric level.
    pub level: Option<String>,
    /// Minimum level by name (`info`, `warning`, ...).
    pub level_tag: Option<String>,
    /// View the message was submitted from.
    pub view: Option<String>,
    /// Lower bound on `read_at`, RFC 3339.
    pub read_after: Option<String>,
    /// Upper bound on `read_at`, RFC 3339.
    pub read_before: Option<String>,
    /// Lower bound on creation time, RFC 3339.
    pub created_after: Option<String>,
    /// Upper bound on creation time, RFC 3339.
    pub created_before: Option<String>,
    /// Case-insensitive text search.
    pub search: Option<String>,
    /// Comma-separated ordering; the first supported term wins.
    pub ordering: Option<String>,
}

/// Parsed listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Filters and ordering.
    pub query: MessageQuery,
    /// Page to return.
    pub page: PageRequest,
}

impl FromIterator<(String, String)> for ListParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "page_size" => &mut params.page_size,
                "unread" => &mut params.unread,
                "extra_tags" => &mut params.extra_tags,
                "level" => &mut params.level,
                "level_tag" => &mut params.level_tag,
                "view" => &mut params.view,
                "read_after" => &mut params.read_after,
                "read_before" => &mut params.read_before,
                "created_after" => &mut params.created_after,
                "created_before" => &mut params.created_before,
                "search" => &mut params.search,
                "ordering" => &mut params.ordering,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }
}

impl ListParams {
    /// Validates the parameters against the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] for malformed filters and
    /// [`ApiError::NotFound`] for a page number that is not a positive
    /// integer.
    pub fn parse(&self, settings: &FlashSettings) -> Result<ListRequest, ApiError> {
        let query = MessageQuery {
            unread: present(self.unread.as_ref())
                .map(|value| {
                    parse_flag(value).ok_or_else(|| invalid("unread", value, "a boolean"))
                })
                .transpose()?,
            extra_tag: present(self.extra_tags.as_ref()).map(str::to_owned),
            level: present(self.level.as_ref())
                .map(|value| {
                    value
                        .parse::<i32>()
                        .map(Level::from_value)
                        .map_err(|_| invalid("level", value, "an integer"))
                })
                .transpose()?,
            min_level: present(self.level_tag.as_ref())
                .map(|value| {
                    Level::from_tag(value).map_err(|err| ApiError::BadRequest(err.to_string()))
                })
                .transpose()?,
            view: present(self.view.as_ref()).map(str::to_owned),
            read: TimeRange {
                after: timestamp("read_after", self.read_after.as_ref())?,
                before: timestamp("read_before", self.read_before.as_ref())?,
            },
            created: TimeRange {
                after: timestamp("created_after", self.created_after.as_ref())?,
                before: timestamp("created_before", self.created_before.as_ref())?,
            },
            search: present(self.search.as_ref()).map(str::to_owned),
            ordering: ordering(self.ordering.as_ref()),
        };
        Ok(ListRequest {
            query,
            page: self.page_request(settings)?,
        })
    }

    fn page_request(&self, settings: &FlashSettings) -> Result<PageRequest, ApiError> {
        let number = match present(self.page.as_ref()) {
            None => 1,
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|number| *number > 0)
                .ok_or_else(|| ApiError::NotFound("Invalid page.".to_owned()))?,
        };
        let size = present(self.page_size.as_ref())
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|size| *size > 0)
            .map_or(settings.page_size, |size| size.min(settings.max_page_size));
        Ok(PageRequest::new(number, size))
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|text| text.trim()).filter(|text| !text.is_empty())
}

fn invalid(field: &str, value: &str, expected: &str) -> ApiError {
    ApiError::BadRequest(format!("{field}: '{value}' is not {expected}"))
}

fn timestamp(field: &str, value: Option<&String>) -> Result<Option<DateTime<Utc>>, ApiError> {
    present(value)
        .map(|text| {
            DateTime::parse_from_rfc3339(text)
                .map(|parsed| parsed.with_timezone(&Utc))
                .map_err(|_| invalid(field, text, "an RFC 3339 timestamp"))
        })
        .transpose()
}

fn ordering(value: Option<&String>) -> MessageOrdering {
    let Some(terms) = present(value) else {
        return MessageOrdering::default();
    };
    terms
        .split(',')
        .find_map(|term| MessageOrdering::parse(term.trim()).ok())
        .unwrap_or_else(|| {
            debug!(ordering = terms, "ignoring unsupported ordering");
            MessageOrdering::default()
        })
}
