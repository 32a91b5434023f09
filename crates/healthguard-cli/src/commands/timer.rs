use clap::{Subcommand, ValueEnum};
use healthguard_core::{Event, PromptResponse};

use super::{open_session, print_json, save_session, Session};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON (fires a due reminder)
    Status,
    /// Pause the countdown
    Pause,
    /// Resume the countdown
    Resume,
    /// Pause if running, resume if paused
    Toggle,
    /// Answer the pending reminder
    Respond {
        #[arg(value_enum)]
        response: ResponseArg,
        /// Reminder cycle to answer (defaults to the pending one)
        #[arg(long)]
        cycle: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ResponseArg {
    Comply,
    Later,
    Dismiss,
}

impl From<ResponseArg> for PromptResponse {
    fn from(arg: ResponseArg) -> Self {
        match arg {
            ResponseArg::Comply => PromptResponse::Comply,
            ResponseArg::Later => PromptResponse::Later,
            ResponseArg::Dismiss => PromptResponse::Dismissed,
        }
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;

    match action {
        TimerAction::Status => {
            let fired = session.tick();
            print_json(&session.snapshot())?;
            if let Some(prompt) = fired {
                print_json(&prompt)?;
            }
        }
        TimerAction::Pause => {
            let event = session.pause();
            print_change(&session, event)?;
        }
        TimerAction::Resume => {
            let event = session.resume();
            print_change(&session, event)?;
        }
        TimerAction::Toggle => {
            let event = session.toggle_pause();
            print_change(&session, event)?;
        }
        TimerAction::Respond { response, cycle } => {
            let cycle = cycle.or_else(|| session.pending_prompt().map(|p| p.cycle));
            let outcome = match cycle {
                Some(cycle) => session.respond(cycle, response.into())?,
                None => None,
            };
            match outcome {
                Some(outcome) => print_json(&outcome)?,
                None => eprintln!("no reminder pending"),
            }
        }
    }

    save_session(&session)?;
    Ok(())
}

/// Print the event a command produced, or the unchanged state if none.
fn print_change(session: &Session, event: Option<Event>) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => print_json(&event),
        None => print_json(&session.snapshot()),
    }
}
