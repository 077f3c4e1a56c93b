use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::market::{EtsyClient, MarketplaceSource};
use crate::tools::status::StatusTracker;

pub struct State {
    pub config: Config,
    pub database: Database,
    pub market: Arc<dyn MarketplaceSource>,
    pub status_tracker: StatusTracker,
}

impl State {
    /// Build state with the real Etsy client
    pub fn new(config: Config, database: Database) -> Arc<Self> {
        let etsy = EtsyClient::new(config.etsy_api_base.clone(), config.etsy_api_key.clone());
        Self::with_market(config, database, Arc::new(etsy))
    }

    /// Build state around any marketplace source
    pub fn with_market(
        config: Config,
        database: Database,
        market: Arc<dyn MarketplaceSource>,
    ) -> Arc<Self> {
        let status_tracker =
            StatusTracker::new(config.database_path.clone(), config.etsy_api_key.is_some());

        Arc::new(Self {
            config,
            database,
            market,
            status_tracker,
        })
    }
}
