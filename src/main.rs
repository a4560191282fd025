use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

mod cache;
mod config;
mod dashboard;
mod error;
mod fixtures;
mod leagues;
mod scores;
mod season;
mod upstream;

use cache::TtlCache;
use config::Config;
use dashboard::AppState;
use leagues::TRACKED_LEAGUES;
use scores::{RawFixtures, ScoreService};
use upstream::ApiFootballClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let client = ApiFootballClient::new(
        &config.base_url()?,
        config.api_key()?,
        config.upstream_timeout(),
    )?;

    let cache: Arc<TtlCache<RawFixtures>> = Arc::new(TtlCache::new(config.cache_max_entries));
    let scores = ScoreService::new(
        Arc::new(client),
        Arc::clone(&cache),
        TRACKED_LEAGUES,
        config.tz()?,
        config.live_ttl(),
        config.today_ttl(),
    );
    info!(
        "Tracking {} leagues in {} (live TTL {:?}, today TTL {:?})",
        TRACKED_LEAGUES.len(),
        scores.timezone().name(),
        config.live_ttl(),
        config.today_ttl()
    );

    // Background sweep so keys for past dates don't pile up
    {
        let cache = Arc::clone(&cache);
        let max_age = config.cache_max_age();
        let mut interval = tokio::time::interval(config.cache_sweep_interval());
        tokio::spawn(async move {
            loop {
                interval.tick().await;
                if cache.sweep(max_age).await > 0 {
                    debug!("{} upstream responses cached", cache.len().await);
                }
            }
        });
    }

    let app = dashboard::router(AppState {
        scores: Arc::new(scores),
    });
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Scoreboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server (blocks until shutdown)
    axum::serve(listener, app).await?;

    Ok(())
}
