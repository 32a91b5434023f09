//! Interactive foreground session.
//!
//! One task serializes everything: the once-a-second timer tick, lines typed
//! on stdin, and Ctrl-C. A line answers the open prompt if there is one,
//! otherwise it is a command.

use std::time::Duration;

use healthguard_core::{Prompt, PromptResponse};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::log::progress_line;
use super::{open_session, save_session, Session};

const HELP: &str = "commands: w = log water, s = log stand, p = pause/resume, t = today, q = quit";

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_loop())
}

async fn run_loop() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = session.settings().reminder_interval;

    println!("{HELP}");
    println!("next reminder: {}", session.status());
    if let Some(prompt) = session.pending_prompt() {
        show_prompt(&prompt);
    }

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Settings are re-read every tick; an edited interval re-arms.
                let current = session.settings().reminder_interval;
                if current != interval {
                    interval = current;
                    session.on_config_changed();
                    println!("interval changed to {current} min, next reminder: {}", session.status());
                    save_session(&session)?;
                }
                if let Some(prompt) = session.tick() {
                    show_prompt(&prompt);
                    save_session(&session)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // stdin closed: an open prompt counts as dismissed.
                    if let Some(prompt) = session.pending_prompt() {
                        session.respond(prompt.cycle, PromptResponse::Dismissed)?;
                    }
                    break;
                };
                if !handle_line(&mut session, line.trim())? {
                    break;
                }
                save_session(&session)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.dispose();
    save_session(&session)?;
    tracing::info!("session ended");
    Ok(())
}

/// Returns `false` when the user asked to quit.
fn handle_line(session: &mut Session, line: &str) -> Result<bool, Box<dyn std::error::Error>> {
    if let Some(prompt) = session.pending_prompt() {
        if let Ok(response) = line.parse::<PromptResponse>() {
            if let Some(outcome) = session.respond(prompt.cycle, response)? {
                match outcome.today {
                    Some(today) => {
                        let settings = session.settings();
                        println!("Nice. Logged a drink and a stand.");
                        println!(
                            "{}",
                            progress_line(&today, settings.daily_water_goal, settings.daily_stand_goal)
                        );
                    }
                    None => println!("Okay, later."),
                }
                println!("next reminder: {}", session.status());
            }
            return Ok(true);
        }
    }

    let settings = session.settings();
    match line {
        "w" => {
            let today = session.log_water()?;
            println!(
                "{}",
                progress_line(&today, settings.daily_water_goal, settings.daily_stand_goal)
            );
        }
        "s" => {
            let today = session.log_stand()?;
            println!(
                "{}",
                progress_line(&today, settings.daily_water_goal, settings.daily_stand_goal)
            );
        }
        "t" => {
            let today = session.today_progress()?;
            println!(
                "{}",
                progress_line(&today, settings.daily_water_goal, settings.daily_stand_goal)
            );
            println!("next reminder: {}", session.status());
        }
        "p" => {
            session.toggle_pause();
            println!("timer: {}", session.status());
        }
        "q" => return Ok(false),
        "" => {}
        _ => println!("{HELP}"),
    }
    Ok(true)
}

fn show_prompt(prompt: &Prompt) {
    println!();
    println!("{}", prompt.message);
    println!("Done it? [y = comply / n = later]");
}
