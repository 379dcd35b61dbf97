use clap::Parser;
use sheet_calendar_sync::cli::Cli;
use sheet_calendar_sync::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    startup::init_logging()?;

    info!("Starting sheet-calendar-sync");

    // Load configuration
    let config = startup::load_config()?;

    startup::run(cli.command, config).await
}
