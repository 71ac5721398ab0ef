use axum::extract::State;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::openapi::{AddressEnvelope, AddressPageEnvelope, IdEnvelope};
use super::response::ApiResponse;
use crate::models::{
    AddressCreate, AddressResult, AddressSearchCondition, AddressUpdate, Page, Requester,
};
use crate::services::AddressService;

pub type AddressState = Arc<AddressStateInner>;

pub struct AddressStateInner {
    pub addresses: AddressService,
    pub instance_id: String,
}

/// Register a delivery address for the requester
#[utoipa::path(
    post,
    path = "/api/v1/addresses",
    tag = "addresses",
    params(("x-user-id" = i64, Header, description = "Requesting user")),
    request_body = AddressCreate,
    responses(
        (status = 200, description = "Address created", body = AddressEnvelope),
        (status = 400, description = "Blank or malformed field", body = AddressEnvelope),
        (status = 401, description = "Missing requester", body = AddressEnvelope)
    )
)]
pub async fn create_address(
    State(state): State<AddressState>,
    requester: Requester,
    ApiJson(request): ApiJson<AddressCreate>,
) -> ApiResponse<AddressResult> {
    info!(user_id = requester.user_id, "Create address request");
    state.addresses.create(requester, request).await.into()
}

/// Search the requester's addresses
#[utoipa::path(
    get,
    path = "/api/v1/addresses",
    tag = "addresses",
    params(
        ("x-user-id" = i64, Header, description = "Requesting user"),
        AddressSearchCondition
    ),
    responses(
        (status = 200, description = "Page of matching addresses", body = AddressPageEnvelope),
        (status = 400, description = "Malformed query", body = AddressPageEnvelope),
        (status = 401, description = "Missing requester or another owner requested", body = AddressPageEnvelope)
    )
)]
pub async fn search_addresses(
    State(state): State<AddressState>,
    requester: Requester,
    ApiQuery(condition): ApiQuery<AddressSearchCondition>,
) -> ApiResponse<Page<AddressResult>> {
    state.addresses.search(requester, &condition).await.into()
}

/// Get one of the requester's addresses by ID
#[utoipa::path(
    get,
    path = "/api/v1/addresses/{id}",
    tag = "addresses",
    params(
        ("id" = Uuid, Path, description = "Address UUID"),
        ("x-user-id" = i64, Header, description = "Requesting user")
    ),
    responses(
        (status = 200, description = "Address found", body = AddressEnvelope),
        (status = 401, description = "Requester does not own the address", body = AddressEnvelope),
        (status = 404, description = "Address not found", body = AddressEnvelope)
    )
)]
pub async fn get_address(
    State(state): State<AddressState>,
    requester: Requester,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResponse<AddressResult> {
    state.addresses.get_owned(requester, id).await.into()
}

/// Change an address owned by the requester
#[utoipa::path(
    put,
    path = "/api/v1/addresses/{id}",
    tag = "addresses",
    params(
        ("id" = Uuid, Path, description = "Address UUID"),
        ("x-user-id" = i64, Header, description = "Requesting user")
    ),
    request_body = AddressUpdate,
    responses(
        (status = 200, description = "Address updated", body = AddressEnvelope),
        (status = 401, description = "Requester does not own the address", body = AddressEnvelope),
        (status = 404, description = "Address not found", body = AddressEnvelope)
    )
)]
pub async fn update_address(
    State(state): State<AddressState>,
    requester: Requester,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<AddressUpdate>,
) -> ApiResponse<AddressResult> {
    state.addresses.update(requester, id, request).await.into()
}

/// Remove an address owned by the requester
#[utoipa::path(
    delete,
    path = "/api/v1/addresses/{id}",
    tag = "addresses",
    params(
        ("id" = Uuid, Path, description = "Address UUID"),
        ("x-user-id" = i64, Header, description = "Requesting user")
    ),
    responses(
        (status = 200, description = "ID of the removed address", body = IdEnvelope),
        (status = 401, description = "Requester does not own the address", body = IdEnvelope),
        (status = 404, description = "Address not found", body = IdEnvelope)
    )
)]
pub async fn delete_address(
    State(state): State<AddressState>,
    requester: Requester,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResponse<Uuid> {
    state.addresses.delete(requester, id).await.into()
}
