use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use healthguard_core::storage::LoggingConfig;
use healthguard_core::Config;

mod commands;
mod logging;

use commands::log::{LogAction, OutputArgs};

#[derive(Parser)]
#[command(name = "healthguard", version, about = "Water and stand-up reminders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log one drink of the configured size
    Water {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Log one stand
    Stand {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Today's progress
    Today {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Totals for one day (YYYY-MM-DD)
    Day {
        date: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Statistics and history
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Reminder timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Export, import or clear records
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Run the reminder loop in the foreground
    Run,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    // Completions never touch the data directory.
    let level = match cli.command {
        Commands::Completions { .. } => LoggingConfig::default().level,
        _ => Config::load_or_default().logging.level,
    };
    logging::init(&level);

    let result = match cli.command {
        Commands::Water { output } => commands::log::run(LogAction::Water, output),
        Commands::Stand { output } => commands::log::run(LogAction::Stand, output),
        Commands::Today { output } => commands::log::run(LogAction::Today, output),
        Commands::Day { date, output } => commands::log::day(&date, output),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Data { action } => commands::data::run(action),
        Commands::Run => commands::run::run(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "healthguard", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
