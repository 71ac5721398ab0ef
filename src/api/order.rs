use axum::extract::State;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::openapi::{DeliveryEnvelope, DeliveryPageEnvelope, OrderEnvelope, OrderResultEnvelope};
use super::response::ApiResponse;
use crate::models::{
    Delivery, DeliverySearchCondition, DeliveryStatusUpdate, Order, OrderCreate, OrderResult,
    Page, PageParams, Requester,
};
use crate::services::{DeliveryService, OrderService};

pub type OrderState = Arc<OrderStateInner>;

pub struct OrderStateInner {
    pub orders: OrderService,
    pub deliveries: DeliveryService,
    pub instance_id: String,
}

/// Place an order
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "orders",
    params(("x-user-id" = i64, Header, description = "Requesting user")),
    request_body = OrderCreate,
    responses(
        (status = 200, description = "Order and its delivery", body = OrderResultEnvelope),
        (status = 400, description = "Invalid products or company mismatch", body = OrderResultEnvelope),
        (status = 404, description = "Address not found", body = OrderResultEnvelope),
        (status = 502, description = "Address service call failed", body = OrderResultEnvelope),
        (status = 503, description = "Address service unavailable", body = OrderResultEnvelope)
    )
)]
pub async fn create_order(
    State(state): State<OrderState>,
    requester: Requester,
    ApiJson(request): ApiJson<OrderCreate>,
) -> ApiResponse<OrderResult> {
    info!(
        user_id = requester.user_id,
        products = request.products.len(),
        "Create order request"
    );
    state.orders.create(requester, request).await.into()
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "orders",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        ("x-user-id" = i64, Header, description = "Requesting user")
    ),
    responses(
        (status = 200, description = "Order found", body = OrderEnvelope),
        (status = 401, description = "Requester does not own the order", body = OrderEnvelope),
        (status = 404, description = "Order not found", body = OrderEnvelope)
    )
)]
pub async fn get_order(
    State(state): State<OrderState>,
    requester: Requester,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResponse<Order> {
    state.orders.get(requester, id).await.into()
}

/// Deliveries of one of the requester's orders
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/deliveries",
    tag = "orders",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        ("x-user-id" = i64, Header, description = "Requesting user"),
        PageParams
    ),
    responses(
        (status = 200, description = "Page of deliveries", body = DeliveryPageEnvelope),
        (status = 401, description = "Requester does not own the order", body = DeliveryPageEnvelope),
        (status = 404, description = "Order not found", body = DeliveryPageEnvelope)
    )
)]
pub async fn get_order_deliveries(
    State(state): State<OrderState>,
    requester: Requester,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResponse<Page<Delivery>> {
    state
        .orders
        .deliveries(requester, id, params.into())
        .await
        .into()
}

/// Search deliveries of the requester's orders
#[utoipa::path(
    get,
    path = "/api/v1/deliveries",
    tag = "deliveries",
    params(
        ("x-user-id" = i64, Header, description = "Requesting user"),
        DeliverySearchCondition
    ),
    responses(
        (status = 200, description = "Page of matching deliveries", body = DeliveryPageEnvelope),
        (status = 400, description = "Malformed query", body = DeliveryPageEnvelope),
        (status = 401, description = "Missing requester or another owner requested", body = DeliveryPageEnvelope)
    )
)]
pub async fn search_deliveries(
    State(state): State<OrderState>,
    requester: Requester,
    ApiQuery(condition): ApiQuery<DeliverySearchCondition>,
) -> ApiResponse<Page<Delivery>> {
    state.deliveries.search(requester, &condition).await.into()
}

/// Deliveries of every order the requester placed
#[utoipa::path(
    get,
    path = "/api/v1/deliveries/me",
    tag = "deliveries",
    params(
        ("x-user-id" = i64, Header, description = "Requesting user"),
        PageParams
    ),
    responses(
        (status = 200, description = "Page of deliveries", body = DeliveryPageEnvelope),
        (status = 401, description = "Missing requester", body = DeliveryPageEnvelope)
    )
)]
pub async fn my_deliveries(
    State(state): State<OrderState>,
    requester: Requester,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResponse<Page<Delivery>> {
    state
        .deliveries
        .list_mine(requester, params.into())
        .await
        .into()
}

#[utoipa::path(
    get,
    path = "/api/v1/deliveries/{id}",
    tag = "deliveries",
    params(
        ("id" = Uuid, Path, description = "Delivery UUID"),
        ("x-user-id" = i64, Header, description = "Requesting user")
    ),
    responses(
        (status = 200, description = "Delivery found", body = DeliveryEnvelope),
        (status = 401, description = "Requester does not own the order", body = DeliveryEnvelope),
        (status = 404, description = "Delivery not found", body = DeliveryEnvelope)
    )
)]
pub async fn get_delivery(
    State(state): State<OrderState>,
    requester: Requester,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResponse<Delivery> {
    state.deliveries.get(requester, id).await.into()
}

/// Move a delivery to its next status
#[utoipa::path(
    patch,
    path = "/api/v1/deliveries/{id}/status",
    tag = "deliveries",
    params(
        ("id" = Uuid, Path, description = "Delivery UUID"),
        ("x-user-id" = i64, Header, description = "Requesting user")
    ),
    request_body = DeliveryStatusUpdate,
    responses(
        (status = 200, description = "Delivery updated", body = DeliveryEnvelope),
        (status = 400, description = "Status cannot move that way", body = DeliveryEnvelope),
        (status = 401, description = "Requester does not own the order", body = DeliveryEnvelope),
        (status = 404, description = "Delivery not found", body = DeliveryEnvelope)
    )
)]
pub async fn update_delivery_status(
    State(state): State<OrderState>,
    requester: Requester,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<DeliveryStatusUpdate>,
) -> ApiResponse<Delivery> {
    info!(id = %id, status = ?update.status, "Update delivery status request");
    state
        .deliveries
        .update_status(requester, id, update.status)
        .await
        .into()
}
