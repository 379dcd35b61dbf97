use crate::cli::{Commands, DeleteCommands};
use crate::components::google_calendar::{GoogleCalendarClient, TokenManager};
use crate::components::{
    CalendarService, GoogleSheetsClient, SheetSource, SyncReport, SyncSettings, Synchronizer,
};
use crate::config::Config;
use crate::error::{other_error, BotResult, Error};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Synchronizer wired to the Google APIs
pub type GoogleSynchronizer = Synchronizer<GoogleSheetsClient, GoogleCalendarClient>;

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(config)),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the Google-backed synchronizer from the config
pub fn build_synchronizer(config: Arc<Config>) -> BotResult<GoogleSynchronizer> {
    let tz = config.tz()?;
    let token_manager = TokenManager::new(Arc::clone(&config));
    let sheets = GoogleSheetsClient::new(config.spreadsheet_id.clone(), token_manager.clone());
    let calendar = GoogleCalendarClient::new(token_manager, tz);

    Ok(Synchronizer::new(
        sheets,
        calendar,
        SyncSettings::from_config(&config),
    ))
}

/// Run one command against a synchronizer
pub async fn execute<S, C>(command: &Commands, synchronizer: &Synchronizer<S, C>) -> BotResult<()>
where
    S: SheetSource,
    C: CalendarService,
{
    match command {
        Commands::Create => {
            let SyncReport { processed, pauses } = synchronizer.create_events().await?;
            println!("Created {} events ({} rate limit pauses)", processed, pauses);
        }
        Commands::Preview => {
            let records = synchronizer.event_records().await?;
            for record in &records {
                println!(
                    "{} - {}  {} [{}] @ {}",
                    record.start_time.format("%Y-%m-%d %H:%M"),
                    record.end_time.format("%H:%M"),
                    record.title,
                    record.category,
                    record.location
                );
            }
            println!("{} events", records.len());
        }
        Commands::Delete(DeleteCommands::Clear { yes }) => {
            if !yes {
                return Err(other_error(
                    "Refusing to delete every event in the calendar without --yes",
                ));
            }
            let SyncReport { processed, pauses } = synchronizer.clear_calendar().await?;
            println!("Deleted {} events ({} rate limit pauses)", processed, pauses);
        }
    }

    Ok(())
}

/// Wire up the Google services and run the command
pub async fn run(command: Commands, config: Arc<Config>) -> miette::Result<()> {
    let synchronizer = build_synchronizer(config)?;

    info!("Running {:?}", command);
    if let Err(e) = execute(&command, &synchronizer).await {
        error!("{:?} failed: {}", command, e);
        return Err(e.into());
    }

    Ok(())
}
