//! newsrelay CLI
//!
//! Meant to be invoked by a scheduler (cron, CI workflow): each invocation
//! runs one relay cycle and exits.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Parser, Subcommand};
use newsrelay::{
    config::Credentials,
    error::{AppError, Result},
    models::{Config, LoggingConfig},
    pipeline::{self, RunOutcome},
    services::{HttpListingFetcher, LogNotifier, Notifier, TelegramNotifier},
    storage::{ArticleStore, LocalStorage, RunLock},
    utils::http,
};

const DEFAULT_CONFIG: &str = "config.toml";

/// newsrelay - forward new articles to Telegram
#[derive(Parser, Debug)]
#[command(
    name = "newsrelay",
    version,
    about = "Forwards newly published articles to a Telegram chat"
)]
struct Cli {
    /// Path to the TOML config file (default: ./config.toml, optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the listing once and forward new articles (default)
    Run {
        /// Log links instead of sending them, still recording them as
        /// processed (seeds the state on a first deployment)
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration and environment
    Validate,

    /// Show the persisted state
    Info,
}

/// Initialize logging. With `to_file`, append to the configured log file
/// when it can be opened; otherwise log to stderr.
fn init_logging(config: &LoggingConfig, verbose: bool, to_file: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    builder.format_timestamp_secs();

    let log_file = config
        .file
        .as_ref()
        .filter(|p| to_file && !p.as_os_str().is_empty());
    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!(
                "Cannot open log file {}: {}. Logging to stderr.",
                path.display(),
                e
            ),
        }
    }

    builder.init();
}

/// Load the config file. An explicitly passed path must load; the default
/// one falls back to built-in settings, returning the reason if it failed.
fn load_config(path: Option<&PathBuf>) -> Result<(Config, Option<AppError>)> {
    match path {
        Some(path) => Ok((Config::load(path)?, None)),
        None => Ok(Config::load_or_default(DEFAULT_CONFIG)),
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let (config, load_failure) = load_config(cli.config.as_ref())?;
    let using_defaults = cli.config.is_none() && !Path::new(DEFAULT_CONFIG).exists();
    let command = cli.command.unwrap_or(Command::Run { dry_run: false });
    // only scheduled runs go to the log file, inspection commands print to the terminal
    init_logging(
        &config.logging,
        cli.verbose,
        matches!(command, Command::Run { .. }),
    );

    log::info!("newsrelay starting...");
    if using_defaults {
        log::info!("No {} found, using default configuration", DEFAULT_CONFIG);
    }
    if let Some(e) = load_failure {
        log::warn!("Config load failed from {}: {}. Using defaults.", DEFAULT_CONFIG, e);
    }

    let storage = LocalStorage::new(&config.storage.processed_file);

    match command {
        Command::Run { dry_run } => {
            config.validate()?;

            let notifier: Box<dyn Notifier> = if dry_run {
                Box::new(LogNotifier)
            } else {
                let credentials = Credentials::from_env()?;
                let client = http::create_telegram_client(&config.telegram)?;
                Box::new(TelegramNotifier::new(
                    client,
                    config.telegram.api_base.clone(),
                    credentials,
                ))
            };

            let lock_path = config.storage.lock_path();
            let _lock = match RunLock::acquire(&lock_path) {
                Ok(lock) => lock,
                Err(AppError::Lock { path, message }) => {
                    log::warn!("Another run holds {} ({}), skipping this one", path, message);
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            let client = http::create_async_client(&config.http)?;
            let fetcher = HttpListingFetcher::new(client, &config.listing)?;

            let summary = pipeline::run_cycle(
                &fetcher,
                notifier.as_ref(),
                &storage,
                &config.delivery,
                Local::now().date_naive(),
            )
            .await;

            if summary.outcome == RunOutcome::Processed {
                log::info!(
                    "Run complete: {} new, {} sent, {} failed, state {}",
                    summary.new,
                    summary.delivered,
                    summary.failed,
                    if summary.saved { "saved" } else { "not saved" }
                );
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            match Credentials::from_env() {
                Ok(credentials) => {
                    log::info!("✓ Credentials found for chat {}", credentials.chat_id)
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        Command::Info => {
            log::info!("State file: {}", storage.path().display());
            log::info!("Lock file: {}", config.storage.lock_path().display());

            let processed = storage.load().await;
            log::info!("Processed articles: {}", processed.len());
            if let Some(last) = processed.last() {
                log::info!("Last forwarded: {} ({})", last.link, last.published_time);
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
