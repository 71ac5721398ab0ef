use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use catpang::api::order::OrderStateInner;
use catpang::api::routes::create_order_router;
use catpang::client::address::RemoteAddressClient;
use catpang::config::Config;
use catpang::db::{InMemoryDeliveryRepository, InMemoryOrderRepository};
use catpang::services::{DeliveryService, OrderService};
use catpang::{metrics, server};

#[tokio::main]
async fn main() -> Result<()> {
    server::init_tracing();

    info!("Starting order service v{}", env!("CARGO_PKG_VERSION"));

    metrics::registry::init_metrics();

    let config = Config::from_env(8082).context("Failed to load configuration")?;
    info!(
        instance_id = %config.server.instance_id,
        address_service = %config.address_service.base_url,
        "Configuration loaded"
    );

    let addresses = RemoteAddressClient::new(&config.address_service)
        .context("Failed to create address service client")?;
    let deliveries = DeliveryService::new(Arc::new(InMemoryDeliveryRepository::new()));
    let orders = OrderService::new(
        Arc::new(InMemoryOrderRepository::new()),
        deliveries.clone(),
        Arc::new(addresses),
    );

    let state = Arc::new(OrderStateInner {
        orders,
        deliveries,
        instance_id: config.server.instance_id.clone(),
    });

    server::serve(create_order_router(state), &config.server_address()).await
}
