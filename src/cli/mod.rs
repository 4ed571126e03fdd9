use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::metrics::stats::DEFAULT_STATS_DAYS;

/// `tsuzuri` - adaptive diary interviewer that learns who you are.
#[derive(Parser, Debug)]
#[command(name = "tsuzuri")]
#[command(version)]
#[command(about = "Interview yourself about your day and grow a personal profile.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an interview over a day's notes
    Run {
        /// Pre-formatted notes for the day
        #[arg(long)]
        notes: PathBuf,

        /// Number of notes (default: non-empty lines in the notes file)
        #[arg(long)]
        note_count: Option<usize>,

        /// Diary date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Write the conversation as JSON to this file
        #[arg(long)]
        transcript: Option<PathBuf>,

        /// Debug-level logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show interview quality metrics
    Stats {
        /// Number of days to cover, including today
        #[arg(long, default_value_t = DEFAULT_STATS_DAYS)]
        days: u32,
    },

    /// Inspect the learned profile
    Profile {
        #[command(subcommand)]
        profile_command: ProfileCommands,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileCommands {
    /// Print the stored profile
    Show,
    /// Print the profile file location
    Path,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        matches!(self.command, Commands::Run { verbose: true, .. })
    }
}
