use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerState;

/// Why the timer picked a fresh deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RearmReason {
    /// The user answered a reminder.
    Response,
    /// The reminder interval was changed.
    ConfigChanged,
}

/// Every state change in the system produces an Event.
/// Presentation code renders them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The deadline passed and a reminder prompt should be shown.
    ReminderDue {
        cycle: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        /// Negative when the deadline had already passed.
        remaining_ms: i64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        deadline: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    TimerRearmed {
        deadline: DateTime<Utc>,
        reason: RearmReason,
        at: DateTime<Utc>,
    },
    /// The pending prompt for `cycle` was answered.
    ReminderAnswered {
        cycle: u64,
        complied: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        remaining_ms: i64,
        deadline: Option<DateTime<Utc>>,
        awaiting_cycle: Option<u64>,
        at: DateTime<Utc>,
    },
}
