//! Market search summaries and the market radar
//!
//! Turns raw marketplace listings into the snapshot the dashboard shows.
//! When the marketplace is unreachable the search falls back to a fixed
//! simulated snapshot, and the radar simply has no trending items.

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use super::etsy::{EtsyListing, EtsySearchResponse, MarketplaceSource, SEARCH_LIMIT};

/// Listings included in a search snapshot
pub const TOP_LISTINGS: usize = 5;
/// Listings included in the radar
pub const RADAR_ITEMS: usize = 4;
/// Broad query used to populate the radar
pub const RADAR_QUERY: &str = "handmade best sellers";
/// Favorer count above which demand is "High"
pub const HIGH_DEMAND_FAVORERS: u64 = 50;
/// Profit estimate reported by the simulated snapshot
pub const MOCK_PROFIT_ESTIMATE: f64 = 24.50;

/// Where a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataSource {
    #[serde(rename = "REAL_ETSY")]
    RealEtsy,
    #[serde(rename = "MOCK_SIMULATION")]
    MockSimulation,
}

/// Simplified listing for the frontend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingSummary {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub likes: u64,
    pub url: Option<String>,
}

impl From<&EtsyListing> for ListingSummary {
    fn from(listing: &EtsyListing) -> Self {
        Self {
            id: listing.listing_id,
            title: listing.title.clone(),
            price: listing.price_major(),
            likes: listing.num_favorers,
            url: listing.url.clone(),
        }
    }
}

/// Demand/competition snapshot for a search term
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub demand: String,
    pub competition: String,
    pub profit_estimate: f64,
    pub listings: Vec<ListingSummary>,
}

/// Response for the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub status: &'static str,
    pub source: DataSource,
    pub data: MarketSnapshot,
}

/// Build a snapshot from real listings. `None` when there are no results.
pub fn summarize_search(response: &EtsySearchResponse) -> Option<SearchResponse> {
    let first = response.results.first()?;

    let demand = if first.num_favorers > HIGH_DEMAND_FAVORERS {
        "High"
    } else {
        "Medium"
    };

    Some(SearchResponse {
        status: "success",
        source: DataSource::RealEtsy,
        data: MarketSnapshot {
            demand: demand.to_string(),
            competition: format!("{} Likes", first.num_favorers),
            profit_estimate: first.price_major(),
            listings: response
                .results
                .iter()
                .take(TOP_LISTINGS)
                .map(ListingSummary::from)
                .collect(),
        },
    })
}

/// The simulated snapshot used while the API is unavailable
pub fn mock_search_response() -> SearchResponse {
    SearchResponse {
        status: "success",
        source: DataSource::MockSimulation,
        data: MarketSnapshot {
            demand: "High (Simulated)".to_string(),
            competition: "Medium".to_string(),
            profit_estimate: MOCK_PROFIT_ESTIMATE,
            listings: Vec::new(),
        },
    }
}

/// Search the marketplace, falling back to the simulated snapshot
pub async fn search_market(source: &dyn MarketplaceSource, query: &str) -> SearchResponse {
    info!("Analyzing market for '{}'", query);

    match source.search_listings(query, SEARCH_LIMIT).await {
        Ok(response) => summarize_search(&response).unwrap_or_else(|| {
            warn!("No listings for '{}', using simulated data", query);
            mock_search_response()
        }),
        Err(e) => {
            warn!("Marketplace search failed ({}), using simulated data", e);
            mock_search_response()
        }
    }
}

// ============================================================================
// Market Radar
// ============================================================================

/// Direction a category is moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    #[serde(rename = "↑")]
    Up,
    #[serde(rename = "→")]
    Flat,
    #[serde(rename = "↓")]
    Down,
}

/// Simulated activity level of a category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryHeat {
    pub name: &'static str,
    pub heat: u8,
    pub trend: Trend,
}

/// Name, heat range and trend for each simulated category
const RADAR_CATEGORIES: [(&str, u8, u8, Trend); 5] = [
    ("Jewelry", 70, 99, Trend::Up),
    ("Home Decor", 40, 80, Trend::Flat),
    ("Clothing", 60, 90, Trend::Up),
    ("Digital Prints", 80, 100, Trend::Up),
    ("Woodworking", 30, 60, Trend::Down),
];

/// Response for the market radar endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RadarResponse {
    pub status: &'static str,
    pub timestamp: f64,
    pub categories: Vec<CategoryHeat>,
    pub trending_items: Vec<ListingSummary>,
    pub active_sector: &'static str,
}

/// Roll a heat value for every radar category
pub fn simulate_category_heat<R: Rng>(rng: &mut R) -> Vec<CategoryHeat> {
    RADAR_CATEGORIES
        .iter()
        .map(|&(name, low, high, trend)| CategoryHeat {
            name,
            heat: rng.gen_range(low..=high),
            trend,
        })
        .collect()
}

/// Trending listings plus simulated category heat
pub async fn market_radar(source: &dyn MarketplaceSource) -> RadarResponse {
    info!("Scanning market radar");

    let trending_items = match source.search_listings(RADAR_QUERY, SEARCH_LIMIT).await {
        Ok(response) => response
            .results
            .iter()
            .take(RADAR_ITEMS)
            .map(ListingSummary::from)
            .collect(),
        Err(e) => {
            warn!("Radar search failed: {}", e);
            Vec::new()
        }
    };

    let categories = simulate_category_heat(&mut rand::thread_rng());

    RadarResponse {
        status: "online",
        timestamp: chrono::Utc::now().timestamp_millis() as f64 / 1000.0,
        categories,
        trending_items,
        active_sector: "Handmade Goods",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::etsy::{EtsyMoney, MarketError};
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn listing(id: i64, favorers: u64, cents: i64) -> EtsyListing {
        EtsyListing {
            listing_id: id,
            title: format!("Listing {id}"),
            url: Some(format!("https://www.etsy.com/listing/{id}")),
            num_favorers: favorers,
            price: Some(EtsyMoney {
                amount: cents,
                divisor: 100,
                currency_code: "USD".to_string(),
            }),
        }
    }

    fn response(n: i64, favorers: u64) -> EtsySearchResponse {
        EtsySearchResponse {
            count: n as u64,
            results: (1..=n).map(|id| listing(id, favorers, 1500 + id)).collect(),
        }
    }

    struct FixedSource(EtsySearchResponse);

    #[async_trait]
    impl MarketplaceSource for FixedSource {
        async fn search_listings(
            &self,
            _keyword: &str,
            _limit: u32,
        ) -> Result<EtsySearchResponse, MarketError> {
            Ok(self.0.clone())
        }
    }

    struct DeniedSource;

    /// Records the requested limit and returns that many listings
    #[derive(Default)]
    struct LimitedSource(std::sync::Mutex<Vec<u32>>);

    #[async_trait]
    impl MarketplaceSource for LimitedSource {
        async fn search_listings(
            &self,
            _keyword: &str,
            limit: u32,
        ) -> Result<EtsySearchResponse, MarketError> {
            self.0.lock().unwrap().push(limit);
            Ok(response(limit as i64, 5))
        }
    }

    #[async_trait]
    impl MarketplaceSource for DeniedSource {
        async fn search_listings(
            &self,
            _keyword: &str,
            _limit: u32,
        ) -> Result<EtsySearchResponse, MarketError> {
            Err(MarketError::PendingApproval)
        }
    }

    #[test]
    fn test_summarize_high_demand() {
        let summary = summarize_search(&response(8, 51)).unwrap();
        assert_eq!(summary.source, DataSource::RealEtsy);
        assert_eq!(summary.data.demand, "High");
        assert_eq!(summary.data.competition, "51 Likes");
        assert_eq!(summary.data.profit_estimate, 15.01);
        assert_eq!(summary.data.listings.len(), TOP_LISTINGS);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["data"]["listings"][0]["likes"], 51);
    }

    #[test]
    fn test_summarize_medium_demand_at_threshold() {
        let summary = summarize_search(&response(2, 50)).unwrap();
        assert_eq!(summary.data.demand, "Medium");
        assert_eq!(summary.data.listings.len(), 2);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize_search(&EtsySearchResponse::default()).is_none());
    }

    #[test]
    fn test_search_response_json_shape() {
        let json = serde_json::to_value(mock_search_response()).unwrap();
        assert_eq!(json["source"], "MOCK_SIMULATION");
        assert_eq!(json["data"]["profit_estimate"], 24.5);
        assert_eq!(json["data"]["listings"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_search_market_falls_back() {
        assert_eq!(search_market(&DeniedSource, "candles").await, mock_search_response());

        let empty = FixedSource(EtsySearchResponse::default());
        assert_eq!(search_market(&empty, "candles").await, mock_search_response());

        let real = FixedSource(response(3, 10));
        assert_eq!(search_market(&real, "candles").await.source, DataSource::RealEtsy);
    }

    #[tokio::test]
    async fn test_searches_request_default_limit() {
        let source = LimitedSource::default();
        let search = search_market(&source, "candles").await;
        assert_eq!(search.data.listings.len(), TOP_LISTINGS);
        let radar = market_radar(&source).await;
        assert_eq!(radar.trending_items.len(), RADAR_ITEMS);

        assert_eq!(*source.0.lock().unwrap(), vec![SEARCH_LIMIT, SEARCH_LIMIT]);
    }

    #[test]
    fn test_category_heat_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let categories = simulate_category_heat(&mut rng);
            assert_eq!(categories.len(), RADAR_CATEGORIES.len());
            for (heat, &(name, low, high, trend)) in categories.iter().zip(RADAR_CATEGORIES.iter()) {
                assert_eq!(heat.name, name);
                assert_eq!(heat.trend, trend);
                assert!(heat.heat >= low && heat.heat <= high);
            }
        }
    }

    #[test]
    fn test_trend_serializes_as_arrow() {
        assert_eq!(serde_json::to_string(&Trend::Up).unwrap(), "\"↑\"");
        assert_eq!(serde_json::to_string(&Trend::Down).unwrap(), "\"↓\"");
    }

    #[tokio::test]
    async fn test_market_radar() {
        let radar = market_radar(&FixedSource(response(6, 90))).await;
        assert_eq!(radar.status, "online");
        assert_eq!(radar.trending_items.len(), RADAR_ITEMS);
        assert_eq!(radar.trending_items[0].likes, 90);
        assert_eq!(radar.categories.len(), 5);
        assert!(radar.timestamp > 0.0);

        let offline = market_radar(&DeniedSource).await;
        assert!(offline.trending_items.is_empty());
        assert_eq!(offline.active_sector, "Handmade Goods");
    }
}
