//! Address service operations callable by other services

use async_trait::async_trait;
use axum::{extract::State, routing::on, Router};
use std::sync::Arc;
use uuid::Uuid;

use super::{HttpMethod, Operation};
use crate::api::extract::ApiPath;
use crate::api::response::ApiResponse;
use crate::models::AddressResult;

pub const ADDRESS_SERVICE: &str = "address-service";

pub const GET_ADDRESS: Operation = Operation {
    name: "getAddress",
    service: ADDRESS_SERVICE,
    method: HttpMethod::Get,
    path: "/api/v1/internal/address/{id}",
};

/// Implemented locally by the address service and remotely by
/// [`RemoteAddressClient`](crate::client::address::RemoteAddressClient).
#[async_trait]
pub trait AddressInternalApi: Send + Sync {
    /// [`GET_ADDRESS`]
    async fn get_address(&self, id: Uuid) -> ApiResponse<AddressResult>;
}

pub type SharedAddressApi = Arc<dyn AddressInternalApi>;

/// Routes for the local implementation, built from the operation constants
pub fn router(api: SharedAddressApi) -> Router {
    Router::new()
        .route(
            &GET_ADDRESS.route_path(),
            on(GET_ADDRESS.method.filter(), get_address),
        )
        .with_state(api)
}

async fn get_address(
    State(api): State<SharedAddressApi>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResponse<AddressResult> {
    api.get_address(id).await
}
