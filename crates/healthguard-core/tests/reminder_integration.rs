//! Integration tests for the reminder session.
//!
//! Drives a full controller over a SQLite store with a manual clock: timer
//! firing, answering prompts, pause/resume and configuration changes.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Duration, TimeZone, Utc};
use healthguard_core::{
    Database, Event, ManualClock, PromptResponse, RearmReason, ReminderConfig,
    ReminderController, TimerState,
};

type Settings = Rc<RefCell<ReminderConfig>>;

fn session() -> (ReminderController<Database, Settings, ManualClock>, ManualClock, Settings) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 9, 2, 9, 0, 0).unwrap());
    let settings: Settings = Rc::new(RefCell::new(ReminderConfig::default()));
    let controller = ReminderController::new(
        Database::open_memory().unwrap(),
        settings.clone(),
        clock.clone(),
    );
    (controller, clock, settings)
}

#[test]
fn test_full_reminder_cycle() {
    let (mut c, clock, _) = session();

    clock.advance_minutes(29);
    assert!(c.tick().is_none());
    clock.advance_minutes(1);
    let prompt = c.tick().expect("reminder should fire at 30 minutes");

    // Polling while the prompt is open never fires again.
    for _ in 0..5 {
        clock.advance_minutes(10);
        assert!(c.tick().is_none());
    }
    assert_eq!(c.engine().state(), TimerState::AwaitingResponse);

    let outcome = c
        .respond(prompt.cycle, PromptResponse::Comply)
        .unwrap()
        .unwrap();
    assert!(matches!(
        outcome.events.as_slice(),
        [
            Event::ReminderAnswered { complied: true, .. },
            Event::TimerRearmed {
                reason: RearmReason::Response,
                ..
            }
        ]
    ));

    let today = c.today_progress().unwrap();
    assert_eq!(today.water_amount, 200);
    assert_eq!(today.stand_count, 1);
    assert_eq!(today.water_percent, 10);
}

#[test]
fn test_pause_at_ten_minutes_fires_at_thirty_running_minutes() {
    let (mut c, clock, _) = session();

    clock.advance_minutes(10);
    c.pause();
    c.resume();

    clock.advance_minutes(19);
    assert!(c.tick().is_none());
    clock.advance_minutes(1);
    assert!(c.tick().is_some(), "should fire 30 minutes after the original start");
}

#[test]
fn test_config_change_discards_elapsed_progress() {
    let (mut c, clock, settings) = session();

    clock.advance_minutes(25);
    settings.borrow_mut().reminder_interval = 30;
    c.on_config_changed();

    clock.advance_minutes(29);
    assert!(c.tick().is_none(), "old deadline must be discarded");
    clock.advance_minutes(1);
    assert!(c.tick().is_some());
}

#[test]
fn test_double_comply_logs_once() {
    let (mut c, clock, _) = session();
    clock.advance_minutes(30);
    let prompt = c.tick().unwrap();

    assert!(c.respond(prompt.cycle, PromptResponse::Comply).unwrap().is_some());
    assert!(c.respond(prompt.cycle, PromptResponse::Comply).unwrap().is_none());

    let records = c.records().list_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].water_amount, 200);
    assert_eq!(records[0].stand_count, 1);
}

#[test]
fn test_manual_logs_during_prompt_are_counted_separately() {
    let (mut c, clock, _) = session();
    clock.advance_minutes(30);
    let prompt = c.tick().unwrap();

    c.log_water().unwrap();
    c.log_stand().unwrap();
    c.respond(prompt.cycle, PromptResponse::Comply).unwrap();

    let today = c.today_progress().unwrap();
    assert_eq!(today.water_amount, 400);
    assert_eq!(today.stand_count, 2);
}

#[test]
fn test_resume_after_overdue_pause_fires_immediately() {
    let (mut c, clock, _) = session();
    clock.advance(Duration::minutes(30) + Duration::seconds(5));
    c.pause();
    clock.advance_minutes(10);
    c.resume();
    assert!(c.tick().is_some());
}

#[test]
fn test_disposed_session_never_fires() {
    let (mut c, clock, _) = session();
    c.dispose();
    clock.advance_minutes(120);
    assert!(c.tick().is_none());
    assert!(c.is_disposed());
}
