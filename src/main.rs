use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use job_finder_bot::config::AppConfig;
use job_finder_bot::db::Database;
use job_finder_bot::logging::init_logging;
use job_finder_bot::notifier::Notifier;
use job_finder_bot::scheduler::Scheduler;
use job_finder_bot::service::BotService;
use job_finder_bot::sources::Aggregator;
use job_finder_bot::store::{HistoryStore, PreferenceStore};
use job_finder_bot::telegram::{run_polling, TelegramClient};
use job_finder_bot::ScheduleTime;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database (overrides config)
    #[arg(long)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Optional log file directory for daily-rotated JSON logs
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start without arming the daily schedule
    #[arg(long)]
    no_schedule: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;
    let cli = Cli::parse();

    let log_level = cli.log_level.unwrap_or_else(|| config.get_log_level());
    let _log_guard = init_logging(Some(&log_level), cli.log_file.as_deref())?;

    info!("Starting job finder bot");

    // Open the database; one handle serves both store interfaces
    let database_path = cli.database.unwrap_or_else(|| config.get_database_url());
    let database = Arc::new(Database::new(&database_path)?);
    let prefs: Arc<dyn PreferenceStore> = database.clone();
    let history: Arc<dyn HistoryStore> = database;

    // Transport doubles as the delivery seam
    let token = config
        .get_telegram_token()
        .context("TELEGRAM_API_KEY is not set")?;
    let telegram = Arc::new(TelegramClient::new(&token, config.telegram.poll_timeout_secs));
    let notifier: Arc<dyn Notifier> = telegram.clone();

    // Job sources: scrape adapter before API adapter
    let aggregator = Arc::new(Aggregator::from_config(
        &config.sources,
        config.get_rapid_api_key(),
    )?);

    let scheduler = Arc::new(Scheduler::new(
        prefs.clone(),
        history.clone(),
        aggregator.clone(),
        notifier.clone(),
        Duration::from_secs(config.schedule.tick_interval_secs),
    ));

    if config.schedule.enabled && !cli.no_schedule {
        let daily_time: ScheduleTime = config
            .schedule
            .daily_time
            .parse()
            .context("Invalid schedule.daily_time")?;
        scheduler.install(daily_time);
    }
    let _scheduler_task = scheduler.spawn();

    let service = Arc::new(BotService::new(
        prefs,
        history,
        aggregator,
        scheduler,
        notifier,
    ));

    info!("Polling for commands");
    run_polling(telegram, service).await;

    Ok(())
}
