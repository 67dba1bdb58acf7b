use std::{env, error::Error, sync::Arc};

use database::{DatabaseConnectionInfo, PgDatabase};
use proximity::{
    area::RegionCatalog,
    client::Client,
    config::ProximityConfig,
    delivery::{LogDelivery, MessageDelivery},
    source::{CandidateSource, InMemorySource},
};
use push::{HttpPushDelivery, PushCredentials};
use web::{start_web_server, WebState};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // configuration
    let config = ProximityConfig::from_env()?;
    let regions = RegionCatalog::load(config.region_catalog_path.as_deref())?;
    log::info!("region catalog loaded, {} regions", regions.len());

    // storage
    let source: Arc<dyn CandidateSource> = match DatabaseConnectionInfo::from_env() {
        Some(database_connection_info) => {
            Arc::new(PgDatabase::connect(database_connection_info).await?)
        }
        None => {
            log::warn!("no database configured, using an empty in-memory store");
            Arc::new(InMemorySource::new())
        }
    };

    // delivery
    let delivery: Arc<dyn MessageDelivery> = match PushCredentials::from_env() {
        Some(credentials) => Arc::new(HttpPushDelivery::new(credentials)?),
        None => {
            log::warn!("no push gateway configured, alerts are only logged");
            Arc::new(LogDelivery)
        }
    };

    // web server
    let bind_address =
        env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned());
    let state = WebState {
        client: Client::new(source, delivery, regions, config),
    };
    start_web_server(state, &bind_address).await?;

    Ok(())
}
