use clap::{Parser, Subcommand};

/// Create or clear Google Calendar events described in a spreadsheet
#[derive(Debug, Parser)]
#[command(name = "sheet-calendar-sync", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create one calendar event for every row of the events sheet
    Create,
    /// Show the events that "create" would add, without touching the calendar
    Preview,
    /// Destructive calendar operations
    #[command(subcommand)]
    Delete(DeleteCommands),
}

#[derive(Debug, Subcommand)]
pub enum DeleteCommands {
    /// Delete EVERY event in the calendar between the configured years
    Clear {
        /// Confirm that all events in the window should be deleted
        #[arg(long)]
        yes: bool,
    },
}
