mod engine;
mod status;

pub use engine::{TimerEngine, TimerState};
pub use status::TimerStatus;
