use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use catpang::api::address::AddressStateInner;
use catpang::api::routes::create_address_router;
use catpang::config::Config;
use catpang::db::InMemoryAddressRepository;
use catpang::services::AddressService;
use catpang::{metrics, server};

#[tokio::main]
async fn main() -> Result<()> {
    server::init_tracing();

    info!("Starting address service v{}", env!("CARGO_PKG_VERSION"));

    metrics::registry::init_metrics();

    let config = Config::from_env(8081).context("Failed to load configuration")?;
    info!(instance_id = %config.server.instance_id, "Configuration loaded");

    let state = Arc::new(AddressStateInner {
        addresses: AddressService::new(Arc::new(InMemoryAddressRepository::new())),
        instance_id: config.server.instance_id.clone(),
    });

    server::serve(create_address_router(state), &config.server_address()).await
}
