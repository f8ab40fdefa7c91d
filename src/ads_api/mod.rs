//! Boundary to the Google Ads API.
//!
//! The dispatch pipeline only ever sees the [`AdsApi`] trait: a query capability returning
//! ordered rows and a mutate capability returning one resource name per operation. The
//! production implementation is [`GoogleAdsClient`]; tests substitute an in-memory double.

mod client;
mod http_client;
mod oauth;
mod operations;

use async_trait::async_trait;
pub use client::GoogleAdsClient;
pub use operations::{MutateOperation, Operation, ResourceKind, UpdateBuilder};
use serde_json::Value;
use thiserror::Error;

/// Failures raised by the external API client
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Google Ads API request failed: {0}")]
    Transport(String),

    #[error("Google Ads API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("OAuth token refresh failed: {0}")]
    Authentication(String),

    #[error("Unexpected Google Ads API response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Query and mutate capabilities scoped to one advertiser account
#[async_trait]
pub trait AdsApi: Send + Sync {
    /// Account every query and mutation is scoped to
    fn customer_id(&self) -> &str;

    /// Run a query and return its rows in the order the API produced them
    async fn query(&self, query: &str) -> Result<Vec<Value>, ApiError>;

    /// Submit all operations as one atomic request; one resource name per operation
    async fn mutate(&self, operations: Vec<MutateOperation>) -> Result<Vec<String>, ApiError>;
}
