use clap::Subcommand;
use healthguard_core::Config;

use super::{open_session, save_session};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "reminder.reminder_interval", "stats.window")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if key.starts_with("reminder.") {
                rearm()?;
            }
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            rearm()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

/// Reminder settings changed: restart the countdown with the new interval.
fn rearm() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;
    session.on_config_changed();
    save_session(&session)
}
