//! MarketLens
//!
//! HTTP backend for material costing and marketplace research.

use marketlens::api::{self, state::State};
use marketlens::build_info;
use marketlens::config::Config;
use marketlens::db;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("marketlens=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = Config::load();
    info!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        info!("Database schema version: {}", version);
        Ok(())
    })?;

    let state = State::new(config, database);
    api::serve(state).await?;

    Ok(())
}
