// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use reqwest::Client;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use crate::config::settings::ResponseShape;
use crate::directory::HomeroomDirectory;
use crate::patron::PatronFetcher;
use crate::server::server::AppState;
use crate::token::TokenManager;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Directory built from literal entries, keeping each ID list's order.
pub fn directory_of(entries: &[(&str, &[&str])]) -> HomeroomDirectory {
    let map: BTreeMap<String, Vec<String>> = entries
        .iter()
        .map(|(name, ids)| {
            (
                name.to_string(),
                ids.iter().map(|id| id.to_string()).collect(),
            )
        })
        .collect();
    HomeroomDirectory::new(map)
}

/// App state wired against a mock upstream at `base_url`.
pub fn test_state(
    base_url: &str,
    shape: ResponseShape,
    entries: &[(&str, &[&str])],
) -> AppState {
    let client = Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("reqwest client");
    let tokens = TokenManager::new(
        client.clone(),
        base_url,
        "test-client".to_string(),
        "test-secret".to_string(),
    );
    let fetcher = PatronFetcher::new(client, base_url);
    AppState::new(directory_of(entries), tokens, fetcher, shape)
}
