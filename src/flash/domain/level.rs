//! Message severity levels.

use super::ParseLevelError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Severity of a flash message.
///
/// The five named levels carry the conventional numeric values; any other
/// integer is kept as [`Level::Custom`] and has an empty tag. Levels compare
/// and hash by numeric value, so `Custom(30)` equals `Warning`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Level {
    /// Development-only detail (10).
    Debug,
    /// Informational notice (20).
    Info,
    /// Successful action (25).
    Success,
    /// Something needs attention (30).
    Warning,
    /// An action failed (40).
    Error,
    /// Host-defined severity.
    Custom(i32),
}

impl Level {
    /// Every named level in ascending severity.
    pub const NAMED: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Success,
        Self::Warning,
        Self::Error,
    ];

    /// Maps a stored integer back to a level.
    #[must_use]
    pub const fn from_value(value: i32) -> Self {
        match value {
            10 => Self::Debug,
            20 => Self::Info,
            25 => Self::Success,
            30 => Self::Warning,
            40 => Self::Error,
            other => Self::Custom(other),
        }
    }

    /// Returns the numeric severity.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::Debug => 10,
            Self::Info => 20,
            Self::Success => 25,
            Self::Warning => 30,
            Self::Error => 40,
            Self::Custom(value) => value,
        }
    }

    /// Returns the level tag, or `""` for custom levels.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match Self::from_value(self.value()) {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Custom(_) => "",
        }
    }

    /// Looks up a named level by tag, ignoring case and surrounding blanks.
    ///
    /// # Errors
    ///
    /// Returns [`ParseLevelError`] when the tag names no known level.
    pub fn from_tag(tag: &str) -> Result<Self, ParseLevelError> {
        let normalized = tag.trim().to_ascii_lowercase();
        Self::NAMED
            .into_iter()
            .find(|level| level.tag() == normalized)
            .ok_or_else(|| ParseLevelError(tag.to_owned()))
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Self::from_value(value)
    }
}

impl From<Level> for i32 {
    fn from(level: Level) -> Self {
        level.value()
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for Level {}

impl Hash for Level {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value().hash(state);
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value().cmp(&other.value())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag() {
            "" => write!(f, "{}", self.value()),
            tag => f.write_str(tag),
        }
    }
}
