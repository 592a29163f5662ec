use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Global shared HTTP client singleton.
///
/// Callers that need a different timeout should override per-request via `.timeout()`;
/// the inference client does this for both discovery and generation.
static SHARED_CLIENT: Lazy<Client> = Lazy::new(|| {
    build_client().unwrap_or_else(|e| {
        log::error!("Failed to build configured HTTP client, using defaults: {}", e);
        Client::new()
    })
});

/// Returns a reference to the global shared HTTP client.
pub fn shared_client() -> &'static Client {
    &SHARED_CLIENT
}

fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .pool_max_idle_per_host(5)
        .pool_idle_timeout(Duration::from_secs(90))
        .connect_timeout(Duration::from_secs(10))
        .build()
}
