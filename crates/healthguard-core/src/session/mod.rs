//! Reminder session controller.
//!
//! Owns the [`TimerEngine`] and the [`RecordStore`] for one session and turns
//! host intents (tick, prompt answer, manual logging, pause toggles, settings
//! changes) into state changes. Callers serialize all calls; there is no
//! internal locking.
//!
//! A reminder cycle runs as follows:
//!
//! 1. `tick()` notices the deadline and returns a [`Prompt`].
//! 2. The host shows it and later calls `respond(prompt.cycle, ..)`.
//! 3. On [`PromptResponse::Comply`] one drink and one stand are logged, and
//!    the timer re-arms with a full interval whatever the answer.

mod settings;

pub use settings::{FileSettings, SettingsSource};

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::records::{HistoryPage, RecordStore};
use crate::stats::{compute_stats, DayProgress, Stats};
use crate::storage::{KvStore, ReminderConfig};
use crate::timer::{TimerEngine, TimerStatus};

/// Text shown when a reminder fires.
pub const REMINDER_MESSAGE: &str = "Time for a break! Drink some water and stand up for a bit.";

/// A reminder waiting for an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    /// Firing this prompt belongs to; pass it back to `respond`.
    pub cycle: u64,
    pub message: &'static str,
}

/// The user's answer to a [`Prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptResponse {
    /// Log a drink and a stand.
    Comply,
    Later,
    /// Prompt closed without choosing; same as `Later`.
    Dismissed,
}

impl FromStr for PromptResponse {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comply" | "y" | "yes" => Ok(Self::Comply),
            "later" | "n" | "no" => Ok(Self::Later),
            "dismiss" | "dismissed" | "" => Ok(Self::Dismissed),
            other => Err(ValidationError::InvalidValue {
                field: "response".into(),
                message: format!("unknown response '{other}'"),
            }),
        }
    }
}

impl fmt::Display for PromptResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Comply => "comply",
            Self::Later => "later",
            Self::Dismissed => "dismissed",
        })
    }
}

/// What answering a prompt did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseOutcome {
    pub events: Vec<Event>,
    /// Today's progress after logging; `None` unless the user complied.
    pub today: Option<DayProgress>,
}

/// Drives one reminder session.
pub struct ReminderController<S, C, K> {
    records: RecordStore<S, K>,
    settings: C,
    engine: TimerEngine,
    disposed: bool,
}

impl<S: KvStore, C: SettingsSource, K: Clock> ReminderController<S, C, K> {
    /// Start a fresh session, due one configured interval from now.
    pub fn new(store: S, settings: C, clock: K) -> Self {
        let engine = TimerEngine::new(clock.now(), settings.load().interval());
        Self::with_engine(store, settings, clock, engine)
    }

    /// Continue a session from a previously saved engine.
    pub fn with_engine(store: S, settings: C, clock: K, engine: TimerEngine) -> Self {
        Self {
            records: RecordStore::new(store, clock),
            settings,
            engine,
            disposed: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn records(&self) -> &RecordStore<S, K> {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut RecordStore<S, K> {
        &mut self.records
    }

    /// Current settings, read fresh.
    pub fn settings(&self) -> ReminderConfig {
        self.settings.load()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn status(&self) -> TimerStatus {
        self.engine.status(self.now())
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot(self.now())
    }

    /// Prompt still waiting for an answer, if any.
    pub fn pending_prompt(&self) -> Option<Prompt> {
        self.engine.awaiting_cycle().map(|cycle| Prompt {
            cycle,
            message: REMINDER_MESSAGE,
        })
    }

    pub fn today_progress(&mut self) -> Result<DayProgress> {
        let goals = self.settings().goals();
        let today = self.records.today_record()?;
        Ok(DayProgress::for_record(&today, goals))
    }

    /// Progress for one past (or current) day.
    pub fn day_detail(&self, date: NaiveDate) -> Result<Option<DayProgress>> {
        let goals = self.settings().goals();
        Ok(self
            .records
            .record_for(date)?
            .map(|r| DayProgress::for_record(&r, goals)))
    }

    /// Statistics over the `window` most recent records.
    pub fn stats(&self, window: usize) -> Result<Stats> {
        let records = self.records.list_records()?;
        Ok(compute_stats(&records, window, self.settings().goals()))
    }

    pub fn history(&self, page: usize, page_size: usize) -> Result<HistoryPage> {
        let records = self.records.list_records()?;
        Ok(HistoryPage::paginate(&records, page, page_size))
    }

    // ── Timer intents ────────────────────────────────────────────────

    /// Poll the timer. Returns the prompt to show when a reminder fires.
    pub fn tick(&mut self) -> Option<Prompt> {
        if self.disposed {
            return None;
        }
        let now = self.now();
        match self.engine.tick(now)? {
            Event::ReminderDue { cycle, .. } => {
                tracing::info!(cycle, "reminder fired");
                Some(Prompt {
                    cycle,
                    message: REMINDER_MESSAGE,
                })
            }
            _ => None,
        }
    }

    /// Apply the answer to the prompt of firing `cycle`.
    ///
    /// Returns `Ok(None)` when that prompt is not open (already answered,
    /// never fired, or the session is disposed). The prompt is closed before
    /// logging, so a storage error on comply cannot lead to double logging
    /// on retry.
    pub fn respond(
        &mut self,
        cycle: u64,
        response: PromptResponse,
    ) -> Result<Option<ResponseOutcome>> {
        if self.disposed {
            return Ok(None);
        }
        let now = self.now();
        let settings = self.settings();
        let Some(timer_event) = self.engine.acknowledge(cycle, now, settings.interval()) else {
            tracing::debug!(cycle, %response, "ignored stale response");
            return Ok(None);
        };

        let complied = response == PromptResponse::Comply;
        tracing::info!(cycle, %response, "reminder answered");
        let mut events = vec![Event::ReminderAnswered {
            cycle,
            complied,
            at: now,
        }];
        events.push(timer_event);

        let today = if complied {
            let record = self
                .records
                .add_water_and_stand(u64::from(settings.water_per_drink))?;
            Some(DayProgress::for_record(&record, settings.goals()))
        } else {
            None
        };

        Ok(Some(ResponseOutcome { events, today }))
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.disposed {
            return None;
        }
        let now = self.now();
        self.engine.pause(now)
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.disposed {
            return None;
        }
        let now = self.now();
        self.engine.resume(now)
    }

    pub fn toggle_pause(&mut self) -> Option<Event> {
        if self.engine.is_paused() {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// The configuration changed externally: re-arm with the new interval.
    pub fn on_config_changed(&mut self) -> Option<Event> {
        if self.disposed {
            return None;
        }
        let now = self.now();
        let interval = self.settings().interval();
        self.engine.reconfigure(now, interval)
    }

    /// Persist new settings, then treat them as a configuration change.
    pub fn save_settings(&mut self, config: ReminderConfig) -> Result<Option<Event>> {
        self.settings.save(&config.validated())?;
        Ok(self.on_config_changed())
    }

    // ── Manual logging ───────────────────────────────────────────────

    /// Log one drink of the configured size.
    pub fn log_water(&mut self) -> Result<DayProgress> {
        let settings = self.settings();
        let record = self
            .records
            .add_water(u64::from(settings.water_per_drink))?;
        Ok(DayProgress::for_record(&record, settings.goals()))
    }

    pub fn log_stand(&mut self) -> Result<DayProgress> {
        let goals = self.settings().goals();
        let record = self.records.add_stand()?;
        Ok(DayProgress::for_record(&record, goals))
    }

    /// Stop reacting to timer callbacks. Later ticks, answers, pause toggles
    /// and config-change signals are no-ops; manual logging still works.
    pub fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            tracing::debug!("reminder session disposed");
        }
    }

    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.records.clock().now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Controller = ReminderController<MemoryStore, Rc<RefCell<ReminderConfig>>, ManualClock>;

    fn controller() -> (Controller, ManualClock, Rc<RefCell<ReminderConfig>>) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap());
        let settings = Rc::new(RefCell::new(ReminderConfig::default()));
        let controller = ReminderController::new(MemoryStore::new(), settings.clone(), clock.clone());
        (controller, clock, settings)
    }

    #[test]
    fn comply_logs_once() {
        let (mut c, clock, _) = controller();
        clock.advance_minutes(30);
        let prompt = c.tick().unwrap();
        assert_eq!(prompt.message, REMINDER_MESSAGE);

        let outcome = c.respond(prompt.cycle, PromptResponse::Comply).unwrap().unwrap();
        let today = outcome.today.unwrap();
        assert_eq!(today.water_amount, 200);
        assert_eq!(today.stand_count, 1);

        assert!(c.respond(prompt.cycle, PromptResponse::Comply).unwrap().is_none());
        let record = c.records_mut().today_record().unwrap();
        assert_eq!(record.water_amount, 200);
        assert_eq!(record.stand_count, 1);
    }

    #[test]
    fn later_and_dismiss_log_nothing() {
        let (mut c, clock, _) = controller();
        clock.advance_minutes(30);
        let prompt = c.tick().unwrap();
        let outcome = c.respond(prompt.cycle, PromptResponse::Later).unwrap().unwrap();
        assert!(outcome.today.is_none());

        clock.advance_minutes(30);
        let prompt = c.tick().unwrap();
        assert_eq!(prompt.cycle, 2);
        c.respond(prompt.cycle, PromptResponse::Dismissed).unwrap();

        assert!(c.records().list_records().unwrap().is_empty());
    }

    #[test]
    fn response_rearms_full_interval() {
        let (mut c, clock, _) = controller();
        clock.advance_minutes(30);
        let prompt = c.tick().unwrap();
        clock.advance_minutes(7);
        c.respond(prompt.cycle, PromptResponse::Later).unwrap();

        clock.advance_minutes(29);
        assert!(c.tick().is_none());
        clock.advance_minutes(1);
        assert!(c.tick().is_some());
    }

    #[test]
    fn uses_latest_settings_on_every_call() {
        let (mut c, _, settings) = controller();
        settings.borrow_mut().water_per_drink = 330;
        assert_eq!(c.log_water().unwrap().water_amount, 330);
    }

    #[test]
    fn config_change_restarts_countdown() {
        let (mut c, clock, settings) = controller();
        clock.advance_minutes(20);
        settings.borrow_mut().reminder_interval = 15;
        c.on_config_changed();

        clock.advance_minutes(14);
        assert!(c.tick().is_none());
        clock.advance_minutes(1);
        assert!(c.tick().is_some());
    }

    #[test]
    fn save_settings_persists_and_rearms() {
        let (mut c, clock, settings) = controller();
        clock.advance_minutes(5);
        let new = ReminderConfig {
            reminder_interval: 60,
            ..ReminderConfig::default()
        };
        assert!(c.save_settings(new).unwrap().is_some());
        assert_eq!(settings.borrow().reminder_interval, 60);
        assert_eq!(c.status().remaining_ms, 60 * 60 * 1000);
    }

    #[test]
    fn toggle_switches_between_paused_and_running() {
        let (mut c, clock, _) = controller();
        clock.advance_minutes(10);
        assert!(matches!(c.toggle_pause(), Some(Event::TimerPaused { .. })));
        assert_eq!(c.status().to_string(), "paused");

        clock.advance_minutes(60);
        assert!(c.tick().is_none());
        assert!(matches!(c.toggle_pause(), Some(Event::TimerResumed { .. })));
        assert_eq!(c.status().to_string(), "20:00");
    }

    #[test]
    fn disposed_controller_ignores_callbacks() {
        let (mut c, clock, _) = controller();
        clock.advance_minutes(30);
        let prompt = c.tick().unwrap();
        c.dispose();

        assert!(c.respond(prompt.cycle, PromptResponse::Comply).unwrap().is_none());
        clock.advance_minutes(60);
        assert!(c.tick().is_none());
        assert!(c.pause().is_none());
        assert!(c.records().list_records().unwrap().is_empty());
    }

    #[test]
    fn pending_prompt_survives_restore() {
        let (mut c, clock, settings) = controller();
        clock.advance_minutes(30);
        let prompt = c.tick().unwrap();
        let engine = c.engine().clone();

        let mut restored = ReminderController::with_engine(
            MemoryStore::new(),
            settings,
            clock.clone(),
            engine,
        );
        assert_eq!(restored.pending_prompt(), Some(prompt.clone()));
        assert!(restored.respond(prompt.cycle, PromptResponse::Comply).unwrap().is_some());
        assert!(restored.pending_prompt().is_none());
    }

    #[test]
    fn parses_responses() {
        assert_eq!("Y".parse::<PromptResponse>().unwrap(), PromptResponse::Comply);
        assert_eq!("later".parse::<PromptResponse>().unwrap(), PromptResponse::Later);
        assert_eq!("".parse::<PromptResponse>().unwrap(), PromptResponse::Dismissed);
        assert!("maybe".parse::<PromptResponse>().is_err());
    }

    #[test]
    fn stats_and_history_use_settings_goals() {
        let (mut c, _, settings) = controller();
        settings.borrow_mut().daily_water_goal = 200;
        settings.borrow_mut().daily_stand_goal = 1;
        c.log_water().unwrap();
        c.log_stand().unwrap();

        assert_eq!(c.stats(5).unwrap().completion_rate_percent, 100);
        assert_eq!(c.history(0, 5).unwrap().records.len(), 1);
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(c.day_detail(date).unwrap().unwrap().overall_percent, 100);
    }

    /// Store that accepts a fixed number of writes, then fails.
    struct FlakyStore {
        inner: MemoryStore,
        writes_left: std::cell::Cell<usize>,
    }

    impl FlakyStore {
        fn new(writes: usize) -> Self {
            Self {
                inner: MemoryStore::new(),
                writes_left: std::cell::Cell::new(writes),
            }
        }
    }

    impl KvStore for FlakyStore {
        fn kv_get(&self, key: &str) -> Result<Option<String>, crate::error::StorageError> {
            self.inner.kv_get(key)
        }

        fn kv_set(&self, key: &str, value: &str) -> Result<(), crate::error::StorageError> {
            match self.writes_left.get() {
                0 => Err(crate::error::StorageError::Locked),
                n => {
                    self.writes_left.set(n - 1);
                    self.inner.kv_set(key, value)
                }
            }
        }
    }

    fn flaky_controller(
        writes: usize,
    ) -> (ReminderController<FlakyStore, RefCell<ReminderConfig>, ManualClock>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 10, 1, 8, 0, 0).unwrap());
        let settings = RefCell::new(ReminderConfig::default());
        let controller = ReminderController::new(FlakyStore::new(writes), settings, clock.clone());
        (controller, clock)
    }

    #[test]
    fn comply_is_one_write() {
        let (mut c, clock) = flaky_controller(1);
        clock.advance_minutes(30);
        let prompt = c.tick().unwrap();

        let outcome = c.respond(prompt.cycle, PromptResponse::Comply).unwrap().unwrap();
        let today = outcome.today.unwrap();
        assert_eq!((today.water_amount, today.stand_count), (200, 1));
    }

    #[test]
    fn failed_comply_logs_neither_counter() {
        let (mut c, clock) = flaky_controller(0);
        clock.advance_minutes(30);
        let prompt = c.tick().unwrap();

        assert!(c.respond(prompt.cycle, PromptResponse::Comply).is_err());
        assert!(c.records().list_records().unwrap().is_empty());
        assert!(c.pending_prompt().is_none());
    }

    #[test]
    fn manual_logging_works_after_dispose() {
        let (mut c, _, _) = controller();
        c.dispose();
        assert_eq!(c.log_water().unwrap().water_amount, 200);
        assert_eq!(c.log_stand().unwrap().stand_count, 1);
        assert!(c.on_config_changed().is_none());
    }
}
