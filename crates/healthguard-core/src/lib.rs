//! # HealthGuard Core Library
//!
//! This library provides the core logic for HealthGuard, a periodic reminder
//! to drink water and stand up. Every operation is available through the
//! `healthguard` CLI binary, which is a thin host over this library.
//!
//! ## Architecture
//!
//! - **Reminder Timer**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()`
//! - **Record Store**: One accumulated record per calendar day, stored as a
//!   JSON document in a key-value store
//! - **Statistics**: Completion rate and averages over a trailing window
//! - **Session Controller**: Ties the timer to the record store for one
//!   reminder session
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Reminder timer state machine
//! - [`RecordStore`]: Daily record repository
//! - [`ReminderController`]: Reminder cycle orchestration
//! - [`Database`]: SQLite-backed [`KvStore`]
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod records;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::{Event, RearmReason};
pub use records::{DailyRecord, HistoryPage, RecordStore};
pub use session::{
    FileSettings, Prompt, PromptResponse, ReminderController, ResponseOutcome, SettingsSource,
};
pub use stats::{compute_stats, DayProgress, Goals, Stats};
pub use storage::{Config, Database, KvStore, MemoryStore, ReminderConfig};
pub use timer::{TimerEngine, TimerState, TimerStatus};
