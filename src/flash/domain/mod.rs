//! Domain model for flash message storage.
//!
//! Messages are addressed either to a session or to a user, carry a severity
//! level and free-text tags, and are read at most once. Nothing in this
//! module touches infrastructure.

mod error;
mod identity;
mod ids;
mod level;
mod message;
mod query;

pub use error::{FlashDomainError, ParseLevelError, ParseOrderingError};
pub use identity::{MessageOwner, MessageScope, RequestIdentity};
pub use ids::{MessageId, SessionKey, UserId};
pub use level::Level;
pub use message::{
    ExtraTags, FieldLimits, FlashMessage, MessageDraft, Notice, PersistedFlashMessage,
};
pub use query::{
    MessageOrdering, MessagePage, MessageQuery, OrderField, PageRequest, ReadSelection, TimeRange,
    UnreadSummary,
};
