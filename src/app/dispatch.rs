use std::io::{self, BufReader};

use anyhow::Result;
use chrono::Local;

use super::report::{render_profile, render_stats};
use super::run::{RunOptions, run_interview};
use crate::cli::{Cli, Commands, ProfileCommands};
use crate::config::Config;
use crate::interview::TerminalIo;
use crate::llm::create_provider;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let locale = config.apply_locale();
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Run {
            notes,
            note_count,
            date,
            transcript,
            verbose: _,
        } => {
            let provider = create_provider(&config.llm)?;
            let options = RunOptions {
                notes_path: notes,
                note_count,
                date: date.unwrap_or(today),
                transcript_path: transcript,
            };
            let mut terminal = TerminalIo::new(BufReader::new(io::stdin()), io::stdout());
            run_interview(&config, &locale, provider.as_ref(), &mut terminal, &options).await?;
            Ok(())
        }

        Commands::Stats { days } => {
            print!("{}", render_stats(&config, &locale, days, today)?);
            Ok(())
        }

        Commands::Profile { profile_command } => {
            match profile_command {
                ProfileCommands::Show => print!("{}", render_profile(&config, &locale)?),
                ProfileCommands::Path => println!("{}", config.profile_path().display()),
            }
            Ok(())
        }
    }
}
