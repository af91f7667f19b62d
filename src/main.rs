//! user-feed
//!
//! Activates a user screen against a remote user service: one fetch is
//! triggered, and the user count is printed for the initial (empty) list and
//! for every update that follows.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌────────────┐  activate   ┌───────────┐  fetch()   ┌──────────────┐
//!   │ main (CLI) │────────────▶│UserScreen │───────────▶│  UserStore   │
//!   └────────────┘             └─────▲─────┘            │ (TaskScope)  │
//!                                    │ show_count       └──────┬───────┘
//!                                    │                         │ stream_users()
//!                              ┌─────┴─────┐            ┌──────▼───────┐
//!                              │ CountView │            │UserRepository│
//!                              └───────────┘            └──────┬───────┘
//!                                                              │ fetch_users()
//!                                                       ┌──────▼───────┐
//!                                                       │HttpUserSource│──▶ GET {base}users
//!                                                       └──────────────┘
//! ```
//!
//! Exits with status 0 once an update arrives, 1 if the fetch failed, the
//! wait deadline passed, or the process was interrupted.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use user_feed::config::loader::{read_config, ConfigError};
use user_feed::config::{validate_config, FeedConfig};
use user_feed::lifecycle::signals;
use user_feed::observability::logging::init_logging;
use user_feed::screen::CountView;
use user_feed::{HttpUserSource, UserRepository, UserScreen, UserStore};

#[derive(Parser)]
#[command(name = "user-feed")]
#[command(about = "Fetch the user list and report how many users it holds", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the user service (overrides the config file).
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides the config file).
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level (overrides the config file).
    #[arg(long)]
    log_level: Option<String>,

    /// How long to wait for the first update before giving up.
    #[arg(long, default_value_t = 30)]
    wait_secs: u64,
}

impl Cli {
    fn resolve_config(&self) -> Result<FeedConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => FeedConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.remote.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.remote.request_timeout_secs = timeout;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_logging(&config.observability.log_level);

    tracing::info!(
        base_url = %config.remote.base_url,
        request_timeout_secs = config.remote.request_timeout_secs,
        "user-feed v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let source = HttpUserSource::from_config(&config.remote)?;
    let store = Arc::new(UserStore::new(UserRepository::new(Arc::new(source))));

    let (update_tx, mut updates) = mpsc::unbounded_channel();
    let view: Arc<dyn CountView> = Arc::new(move |count: usize| {
        println!("Users: {count}");
        let _ = update_tx.send(count);
    });

    let (failure_tx, mut failures) = mpsc::unbounded_channel();
    let _failure_sub = store.subscribe_failures(move |failure| {
        if let Some(failure) = failure.as_ref() {
            let _ = failure_tx.send(failure.clone());
        }
    });

    let mut screen = UserScreen::new(Arc::clone(&store), view);
    screen.activate();

    // The initial empty list is delivered during activation.
    let _ = updates.recv().await;

    let updated = tokio::select! {
        Some(count) = updates.recv() => {
            tracing::info!(count, "User list loaded");
            true
        }
        Some(failure) = failures.recv() => {
            tracing::error!(
                fetch_id = %failure.fetch_id,
                kind = %failure.kind,
                error = %failure.message,
                "Could not load users"
            );
            false
        }
        _ = tokio::time::sleep(Duration::from_secs(cli.wait_secs)) => {
            tracing::warn!(wait_secs = cli.wait_secs, "No update before the deadline");
            false
        }
        _ = signals::interrupted() => false,
    };

    screen.deactivate();
    store.close();

    tracing::info!("Shutdown complete");
    Ok(if updated { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
