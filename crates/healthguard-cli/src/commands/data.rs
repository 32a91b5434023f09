use std::path::PathBuf;

use clap::Subcommand;

use super::{open_session, save_session};

#[derive(Subcommand)]
pub enum DataAction {
    /// Write all records as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace all records with the contents of an export
    Import {
        /// File produced by `data export`
        file: PathBuf,
    },
    /// Delete all records
    Clear {
        /// Required to actually delete
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;

    match action {
        DataAction::Export { output } => {
            let text = session.records().export_as_text()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    eprintln!("exported to {}", path.display());
                }
                None => println!("{text}"),
            }
        }
        DataAction::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            if !session.records_mut().import_from_text(&text) {
                return Err(format!("{} is not a valid export; nothing imported", file.display()).into());
            }
            println!("imported {} record(s)", session.records().list_records()?.len());
        }
        DataAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear without --yes".into());
            }
            session.records_mut().clear_all()?;
            println!("all records cleared");
        }
    }

    save_session(&session)?;
    Ok(())
}
