use anyhow::Result;
use clap::Parser;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use homeroom_proxy::config::loader::load_config;
use homeroom_proxy::directory::HomeroomDirectory;
use homeroom_proxy::patron::PatronFetcher;
use homeroom_proxy::server::server::{start, AppState};
use homeroom_proxy::token::TokenManager;
use homeroom_proxy::utils::logging;
use homeroom_proxy::utils::logging::LogLevel;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "homeroom-proxy.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config and init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = load_config(&args.config)?;
    logging::run(service_config.logging.as_ref(), args.log_level);

    // -------------------------------
    // 2. Load the homeroom directory
    // -------------------------------

    let directory = HomeroomDirectory::from_config(&service_config.directory)?;
    info!(homerooms = directory.len(), "directory loaded");

    // -------------------------------
    // 3. Create request client and upstream components
    // -------------------------------

    let (client_id, client_secret) = service_config.upstream.credentials()?;
    let client = Client::builder()
        .timeout(Duration::from_secs(service_config.upstream.timeout_seconds))
        .build()?;

    let tokens = TokenManager::new(
        client.clone(),
        &service_config.upstream.base_url,
        client_id,
        client_secret,
    );
    let fetcher = PatronFetcher::new(client, &service_config.upstream.base_url);

    // -------------------------------
    // 4. Start HTTP server
    // -------------------------------

    let state = AppState::new(directory, tokens, fetcher, service_config.response_shape);
    info!("Service starting...");
    start(&service_config.server, state).await
}
