//! Headless order-ahead dashboard: keeps the queue live and logs changes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use order_ahead_service::{spawn_dashboard, HttpApi, LiveFeed, ServiceConfig, SystemClock};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "order-ahead-service")]
#[clap(about = "Tracks a location's order-ahead queue and reports expiries")]
struct Cli {
    /// TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Order API base URL
    #[clap(long)]
    api_url: Option<String>,

    /// Websocket URL of the live order feed
    #[clap(long)]
    feed_url: Option<String>,

    /// Company identifier
    #[clap(long)]
    company: Option<String>,

    /// Location identifier
    #[clap(long)]
    location: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[clap(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn apply(&self, config: &mut ServiceConfig) {
        if let Some(v) = &self.api_url {
            config.api_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = &self.feed_url {
            config.feed_url = Some(v.clone());
        }
        if let Some(v) = &self.company {
            config.company_oid = v.clone();
        }
        if let Some(v) = &self.location {
            config.location_oid = v.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ServiceConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    info!(
        api = %config.api_base_url,
        company = %config.company_oid,
        location = %config.location_oid,
        "Starting order-ahead service"
    );

    let api = Arc::new(HttpApi::new(config.clone())?);
    let handle = spawn_dashboard(api, Arc::new(SystemClock), config.tick_interval());

    if let Some(url) = config.feed_url.clone() {
        tokio::spawn(LiveFeed::new(url, handle.commands()).run());
    }

    let mut snapshots = handle.subscribe();
    let mut last_seen = (usize::MAX, usize::MAX);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                let expired = snapshot.orders.iter().filter(|o| o.is_expired).count();
                let counts = (snapshot.orders.len(), expired);
                if counts != last_seen {
                    last_seen = counts;
                    info!(orders = counts.0, expired = counts.1, ticking = snapshot.ticker_active, "queue changed");
                    for order in &snapshot.orders {
                        debug!(
                            transaction = %order.key.transaction_oid,
                            countdown = %order.countdown(),
                            expired = order.is_expired,
                            processing = order.is_processing,
                            "order"
                        );
                    }
                }
                if let Some(status) = &snapshot.status {
                    debug!("{}", status);
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}
