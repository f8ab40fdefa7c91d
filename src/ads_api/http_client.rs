//! Process-wide HTTP client for the Ads API and the OAuth token endpoint.
//!
//! One `searchStream` call can return a full report in a single response, so the request timeout
//! is sized for the slowest report rather than for token refreshes. Both hosts share one pool
//! that lives for the whole server process.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;

/// Upper bound for a whole request, including streaming the report body
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// TCP and TLS setup against `googleads.googleapis.com` or `oauth2.googleapis.com`
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Idle connections outlive the gap between consecutive agent tool calls
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const POOL_MAX_IDLE_PER_HOST: usize = 10;
const USER_AGENT: &str = concat!("google_ads_mcp/", env!("CARGO_PKG_VERSION"));

static HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
});

pub fn get_client() -> &'static Client {
    &HTTP_CLIENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ads_and_oauth_share_one_client() {
        assert!(std::ptr::eq(get_client(), get_client()));
    }

    #[test]
    fn test_connect_timeout_fits_inside_request_timeout() {
        assert!(CONNECT_TIMEOUT < REQUEST_TIMEOUT);
        assert!(USER_AGENT.starts_with("google_ads_mcp/"));
    }
}
