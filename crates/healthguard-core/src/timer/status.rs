use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TimerState;

/// Timer state as handed to presentation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerStatus {
    pub state: TimerState,
    pub remaining_ms: i64,
    pub deadline: Option<DateTime<Utc>>,
    pub awaiting_cycle: Option<u64>,
}

impl fmt::Display for TimerStatus {
    /// `mm:ss` while running, otherwise a word for the state.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            TimerState::Paused => f.write_str("paused"),
            TimerState::AwaitingResponse => f.write_str("reminder due"),
            TimerState::Running if self.remaining_ms <= 0 => f.write_str("reminder due"),
            TimerState::Running => {
                let total_secs = self.remaining_ms / 1000;
                write!(f, "{}:{:02}", total_secs / 60, total_secs % 60)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(state: TimerState, remaining_ms: i64) -> TimerStatus {
        TimerStatus {
            state,
            remaining_ms,
            deadline: None,
            awaiting_cycle: None,
        }
    }

    #[test]
    fn running_shows_minutes_and_seconds() {
        assert_eq!(status(TimerState::Running, 1_805_999).to_string(), "30:05");
        assert_eq!(status(TimerState::Running, 59_000).to_string(), "0:59");
    }

    #[test]
    fn other_states_show_words() {
        assert_eq!(status(TimerState::Paused, 60_000).to_string(), "paused");
        assert_eq!(status(TimerState::AwaitingResponse, 0).to_string(), "reminder due");
        assert_eq!(status(TimerState::Running, 0).to_string(), "reminder due");
    }
}
