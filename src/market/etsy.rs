//! Etsy Open API client
//!
//! Minimal client for the v3 active-listings search.
//! See: https://developers.etsy.com/documentation/reference#operation/findAllListingsActive

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default public API host
pub const DEFAULT_API_BASE: &str = "https://openapi.etsy.com";

/// Number of listings requested per search
pub const SEARCH_LIMIT: u32 = 10;

/// Marketplace error types
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("No marketplace API key configured")]
    MissingApiKey,

    #[error("Access denied (403): application is pending approval")]
    PendingApproval,

    #[error("Marketplace API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Marketplace request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Response from the active-listings endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EtsySearchResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<EtsyListing>,
}

/// A single listing as returned by Etsy (only the fields we read)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EtsyListing {
    #[serde(default)]
    pub listing_id: i64,
    #[serde(default)]
    pub title: String,
    pub url: Option<String>,
    #[serde(default)]
    pub num_favorers: u64,
    pub price: Option<EtsyMoney>,
}

/// Etsy money: an integer amount over a divisor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EtsyMoney {
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub divisor: i64,
    #[serde(default)]
    pub currency_code: String,
}

impl EtsyMoney {
    /// Amount in major currency units. A missing divisor means cents.
    pub fn to_major(&self) -> f64 {
        let divisor = if self.divisor > 0 { self.divisor } else { 100 };
        self.amount as f64 / divisor as f64
    }
}

impl EtsyListing {
    /// Listing price in major currency units (0 when absent)
    pub fn price_major(&self) -> f64 {
        self.price.as_ref().map(EtsyMoney::to_major).unwrap_or(0.0)
    }
}

/// A source of marketplace listings
#[async_trait]
pub trait MarketplaceSource: Send + Sync {
    /// Search active listings matching a keyword, returning at most `limit`
    async fn search_listings(&self, keyword: &str, limit: u32)
        -> Result<EtsySearchResponse, MarketError>;
}

/// Etsy HTTP client
pub struct EtsyClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl EtsyClient {
    /// Create a new client. Without an API key every search fails with
    /// [`MarketError::MissingApiKey`].
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client: reqwest::Client::new(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn listings_url(&self) -> String {
        format!("{}/v3/application/listings/active", self.base_url)
    }
}

#[async_trait]
impl MarketplaceSource for EtsyClient {
    async fn search_listings(
        &self,
        keyword: &str,
        limit: u32,
    ) -> Result<EtsySearchResponse, MarketError> {
        let api_key = self.api_key.as_deref().ok_or(MarketError::MissingApiKey)?;

        info!("Calling Etsy API for: {}", keyword);
        let limit = limit.to_string();
        let resp = self
            .client
            .get(self.listings_url())
            .query(&[
                ("client_id", api_key),
                ("keywords", keyword),
                ("limit", limit.as_str()),
                ("sort_on", "score"),
                ("includes", "Images"),
            ])
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => {
                let body: EtsySearchResponse = resp.json().await?;
                debug!("Etsy returned {} of {} listings", body.results.len(), body.count);
                Ok(body)
            }
            StatusCode::FORBIDDEN => {
                warn!("Etsy access denied (403); app may still be pending");
                Err(MarketError::PendingApproval)
            }
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(MarketError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}
