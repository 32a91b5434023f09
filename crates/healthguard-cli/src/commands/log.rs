use clap::Args;
use healthguard_core::records::parse_date;
use healthguard_core::DayProgress;

use super::{open_session, print_json, save_session};

#[derive(Args)]
pub struct OutputArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy)]
pub enum LogAction {
    Water,
    Stand,
    Today,
}

pub fn run(action: LogAction, output: OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;
    let progress = match action {
        LogAction::Water => session.log_water()?,
        LogAction::Stand => session.log_stand()?,
        LogAction::Today => session.today_progress()?,
    };
    save_session(&session)?;

    if output.json {
        return print_json(&progress);
    }
    let settings = session.settings();
    match action {
        LogAction::Water => println!("Logged {} ml of water", settings.water_per_drink),
        LogAction::Stand => println!("Logged a stand"),
        LogAction::Today => {}
    }
    println!(
        "{}",
        progress_line(&progress, settings.daily_water_goal, settings.daily_stand_goal)
    );
    Ok(())
}

/// Show one day's totals and completion.
pub fn day(date: &str, output: OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let date = parse_date(date)?;
    let session = open_session()?;
    let Some(progress) = session.day_detail(date)? else {
        return Err(format!("no record for {date}").into());
    };

    if output.json {
        return print_json(&progress);
    }
    let settings = session.settings();
    println!("Date:     {}", progress.date);
    println!(
        "{}",
        progress_line(&progress, settings.daily_water_goal, settings.daily_stand_goal)
    );
    println!("Overall:  {}%", progress.overall_percent);
    Ok(())
}

pub fn progress_line(progress: &DayProgress, water_goal: u32, stand_goal: u32) -> String {
    format!(
        "Water:    {}/{} ml ({}%)\nStand:    {}/{} ({}%)",
        progress.water_amount,
        water_goal,
        progress.water_percent,
        progress.stand_count,
        stand_goal,
        progress.stand_percent,
    )
}
