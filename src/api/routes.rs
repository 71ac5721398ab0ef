use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::address::{
    create_address, delete_address, get_address, search_addresses, update_address, AddressState,
};
use super::fallback;
use super::health::{self, HealthInfo};
use super::middleware::logging_middleware;
use super::openapi::{AddressApiDoc, OrderApiDoc};
use super::order::{
    create_order, get_delivery, get_order, get_order_deliveries, my_deliveries,
    search_deliveries, update_delivery_status, OrderState,
};
use crate::contract::{self, address::ADDRESS_SERVICE};
use crate::metrics;

pub const ORDER_SERVICE: &str = "order-service";

/// Address service: public routes plus the internal contract routes
pub fn create_address_router(state: AddressState) -> Router {
    let info = HealthInfo {
        service: ADDRESS_SERVICE,
        instance_id: state.instance_id.clone(),
    };
    let internal = contract::address::router(Arc::new(state.addresses.clone()));

    let api = Router::new()
        .route(
            "/api/v1/addresses",
            post(create_address).get(search_addresses),
        )
        .route(
            "/api/v1/addresses/:id",
            get(get_address).put(update_address).delete(delete_address),
        )
        .with_state(state)
        .merge(internal);

    with_common_layers(api, info, AddressApiDoc::openapi())
}

pub fn create_order_router(state: OrderState) -> Router {
    let info = HealthInfo {
        service: ORDER_SERVICE,
        instance_id: state.instance_id.clone(),
    };

    let api = Router::new()
        .route("/api/v1/orders", post(create_order))
        .route("/api/v1/orders/:id", get(get_order))
        .route("/api/v1/orders/:id/deliveries", get(get_order_deliveries))
        .route("/api/v1/deliveries", get(search_deliveries))
        .route("/api/v1/deliveries/me", get(my_deliveries))
        .route("/api/v1/deliveries/:id", get(get_delivery))
        .route(
            "/api/v1/deliveries/:id/status",
            patch(update_delivery_status),
        )
        .with_state(state);

    with_common_layers(api, info, OrderApiDoc::openapi())
}

fn with_common_layers(
    api: Router,
    info: HealthInfo,
    doc: utoipa::openapi::OpenApi,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api.merge(health::router(info))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", doc))
        .fallback(fallback::not_found)
        // Order matters: 405 envelope -> panic -> compression -> logging -> metrics -> cors -> trace
        .layer(middleware::from_fn(fallback::method_not_allowed))
        .layer(CatchPanicLayer::custom(fallback::handle_panic))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
