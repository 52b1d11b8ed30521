//! Reminder extraction and calendar event types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Length of every reminder event, in minutes.
pub const REMINDER_DURATION_MINUTES: i64 = 30;

/// Hour used when a reminder only names a date.
pub const DEFAULT_REMINDER_HOUR: u32 = 9;

/// Reminder details as extracted from free text by the text model.
///
/// `start` is kept as text; it is parsed separately so that a date-only value
/// can fall back to the default hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderDraft {
    pub summary: String,
    pub start: String,
}

/// A calendar event ready to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// IANA time zone name the local times are expressed in.
    pub time_zone: String,
}
