pub mod config;
pub mod data;
pub mod log;
pub mod run;
pub mod stats;
pub mod timer;

use healthguard_core::storage::{Database, KvStore};
use healthguard_core::{FileSettings, ReminderController, SystemClock, TimerEngine};

/// Key holding the persisted timer engine, next to the record collection.
const ENGINE_KEY: &str = "timer_engine";

pub type Session = ReminderController<Database, FileSettings, SystemClock>;

/// Open the session, continuing the saved timer if there is one.
pub fn open_session() -> Result<Session, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let settings = FileSettings::default_location()?;
    let session = match load_engine(&db) {
        Some(engine) => ReminderController::with_engine(db, settings, SystemClock, engine),
        None => ReminderController::new(db, settings, SystemClock),
    };
    Ok(session)
}

fn load_engine(db: &Database) -> Option<TimerEngine> {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        match serde_json::from_str::<TimerEngine>(&json) {
            Ok(engine) => return Some(engine),
            Err(e) => tracing::warn!(error = %e, "discarding unreadable timer state"),
        }
    }
    None
}

pub fn save_session(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(session.engine())?;
    session.records().kv().kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
