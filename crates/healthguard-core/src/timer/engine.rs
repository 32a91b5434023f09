//! Reminder timer implementation.
//!
//! The timer is a wall-clock-based state machine. It does not use internal
//! threads or read the clock itself: every command takes the current instant,
//! and the caller is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Running --deadline--> AwaitingResponse --acknowledge--> Running
//!    \                        /
//!     +--pause--> Paused <---+
//!                   |
//!                 resume --> Running | AwaitingResponse
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Utc::now(), interval);
//! // In a loop:
//! if let Some(Event::ReminderDue { cycle, .. }) = engine.tick(Utc::now()) {
//!     // show prompt, later:
//!     engine.acknowledge(cycle, Utc::now(), interval);
//! }
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::status::TimerStatus;
use crate::events::{Event, RearmReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// Counting down to `deadline`.
    Running,
    /// Countdown frozen; remaining time is remembered.
    Paused,
    /// A reminder fired and the prompt has not been answered yet.
    AwaitingResponse,
}

/// Core reminder timer.
///
/// Operates on caller-supplied instants -- no internal thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEngine {
    state: TimerState,
    /// Next reminder instant. Meaningful only while `Running`.
    deadline: DateTime<Utc>,
    /// Time left when paused, in milliseconds. Negative if the deadline had
    /// already passed but was not yet processed.
    #[serde(default)]
    paused_remaining_ms: Option<i64>,
    /// Firing whose prompt is still open. Survives a pause.
    #[serde(default)]
    awaiting_cycle: Option<u64>,
    /// Number of reminders fired so far.
    #[serde(default)]
    cycle: u64,
}

impl TimerEngine {
    /// Create a running timer due one `interval` after `now`.
    pub fn new(now: DateTime<Utc>, interval: Duration) -> Self {
        Self {
            state: TimerState::Running,
            deadline: now + interval,
            paused_remaining_ms: None,
            awaiting_cycle: None,
            cycle: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        (self.state == TimerState::Running).then_some(self.deadline)
    }

    pub fn awaiting_cycle(&self) -> Option<u64> {
        self.awaiting_cycle
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_cycle.is_some()
    }

    /// Time left before the next reminder, never negative.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        let left = match self.state {
            TimerState::Running => self.deadline - now,
            TimerState::Paused if self.awaiting_cycle.is_none() => {
                Duration::milliseconds(self.paused_remaining_ms.unwrap_or(0))
            }
            _ => Duration::zero(),
        };
        left.max(Duration::zero())
    }

    pub fn status(&self, now: DateTime<Utc>) -> TimerStatus {
        TimerStatus {
            state: self.state,
            remaining_ms: self.remaining(now).num_milliseconds(),
            deadline: self.deadline(),
            awaiting_cycle: self.awaiting_cycle,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            state: self.state,
            remaining_ms: self.remaining(now).num_milliseconds(),
            deadline: self.deadline(),
            awaiting_cycle: self.awaiting_cycle,
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Call periodically. Returns `Some(Event::ReminderDue)` exactly once per
    /// deadline crossing.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running || now < self.deadline {
            return None;
        }
        self.cycle += 1;
        self.state = TimerState::AwaitingResponse;
        self.awaiting_cycle = Some(self.cycle);
        tracing::debug!(cycle = self.cycle, "reminder due");
        Some(Event::ReminderDue {
            cycle: self.cycle,
            at: now,
        })
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.state {
            TimerState::Running | TimerState::AwaitingResponse => {
                let remaining_ms = (self.deadline - now).num_milliseconds();
                self.state = TimerState::Paused;
                self.paused_remaining_ms = Some(remaining_ms);
                tracing::debug!(remaining_ms, "timer paused");
                Some(Event::TimerPaused {
                    remaining_ms,
                    at: now,
                })
            }
            TimerState::Paused => None,
        }
    }

    /// Continue from where `pause` left off.
    ///
    /// The new deadline is `now` plus the remembered remaining time, or `now`
    /// itself if that was not positive. An unanswered prompt stays open.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        let remaining =
            Duration::milliseconds(self.paused_remaining_ms.take().unwrap_or(0)).max(Duration::zero());
        self.deadline = now + remaining;
        self.state = if self.awaiting_cycle.is_some() {
            TimerState::AwaitingResponse
        } else {
            TimerState::Running
        };
        tracing::debug!(deadline = %self.deadline, "timer resumed");
        Some(Event::TimerResumed {
            deadline: self.deadline,
            at: now,
        })
    }

    /// Close the prompt opened by firing `cycle` and re-arm with a full
    /// `interval`.
    ///
    /// Returns `None` if `cycle` is not the prompt currently open, so a
    /// duplicate or stale answer changes nothing. While paused, the timer
    /// stays paused with a full interval remembered.
    pub fn acknowledge(
        &mut self,
        cycle: u64,
        now: DateTime<Utc>,
        interval: Duration,
    ) -> Option<Event> {
        if self.awaiting_cycle != Some(cycle) {
            return None;
        }
        self.awaiting_cycle = None;

        if self.state == TimerState::Paused {
            let remaining_ms = interval.num_milliseconds();
            self.paused_remaining_ms = Some(remaining_ms);
            return Some(Event::TimerPaused {
                remaining_ms,
                at: now,
            });
        }

        self.rearm(now, interval, RearmReason::Response)
    }

    /// React to a changed reminder interval.
    ///
    /// A running countdown restarts from `now`, discarding progress. A paused
    /// timer remembers the new full interval. An open prompt is left alone.
    pub fn reconfigure(&mut self, now: DateTime<Utc>, interval: Duration) -> Option<Event> {
        match self.state {
            TimerState::Running => self.rearm(now, interval, RearmReason::ConfigChanged),
            TimerState::Paused if self.awaiting_cycle.is_none() => {
                let remaining_ms = interval.num_milliseconds();
                self.paused_remaining_ms = Some(remaining_ms);
                Some(Event::TimerPaused {
                    remaining_ms,
                    at: now,
                })
            }
            _ => None,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn rearm(&mut self, now: DateTime<Utc>, interval: Duration, reason: RearmReason) -> Option<Event> {
        self.state = TimerState::Running;
        self.deadline = now + interval;
        tracing::debug!(deadline = %self.deadline, ?reason, "timer re-armed");
        Some(Event::TimerRearmed {
            deadline: self.deadline,
            reason,
            at: now,
        })
    }
}
