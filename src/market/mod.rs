//! Marketplace module
//!
//! Etsy listing search and the derived market snapshots.

pub mod etsy;
pub mod insights;

pub use etsy::{EtsyClient, EtsySearchResponse, MarketError, MarketplaceSource};
pub use insights::{
    market_radar, mock_search_response, search_market, summarize_search, DataSource,
    ListingSummary, RadarResponse, SearchResponse,
};
