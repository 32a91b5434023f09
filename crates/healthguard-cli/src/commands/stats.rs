use clap::Subcommand;
use healthguard_core::{Config, DayProgress};

use super::log::progress_line;
use super::{open_session, print_json};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Completion rate and averages over recent days
    Summary {
        /// Number of most recent days (defaults to stats.window)
        #[arg(long)]
        window: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Daily records, most recent first
    History {
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let session = open_session()?;

    match action {
        StatsAction::Summary { window, json } => {
            let window = window.unwrap_or(config.stats.window as usize);
            let stats = session.stats(window)?;
            if json {
                return print_json(&stats);
            }
            println!("Last {} day(s)", stats.days);
            println!("Goals met:     {}%", stats.completion_rate_percent);
            println!("Average water: {} ml", stats.avg_water_ml);
            println!("Average stand: {}", stats.avg_stand_count);
        }
        StatsAction::History { page, json } => {
            let history = session.history(page.saturating_sub(1), config.stats.page_size as usize)?;
            if json {
                return print_json(&history);
            }
            let stats = session.stats(config.stats.window as usize)?;
            println!(
                "Last {} day(s): goals met {}%, avg water {} ml, avg stand {}",
                stats.days, stats.completion_rate_percent, stats.avg_water_ml, stats.avg_stand_count
            );
            println!();

            let settings = session.settings();
            let goals = settings.goals();
            if history.records.is_empty() {
                println!("No records yet");
            }
            for record in &history.records {
                let progress = DayProgress::for_record(record, goals);
                println!("{}", record.date);
                println!(
                    "{}",
                    progress_line(&progress, settings.daily_water_goal, settings.daily_stand_goal)
                );
            }
            println!("Page {}/{}", history.page + 1, history.total_pages);
        }
    }
    Ok(())
}
