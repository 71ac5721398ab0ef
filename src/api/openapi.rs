//! OpenAPI documents, one per service.
//!
//! `ApiResponse<T>` is generic, so the documents describe each concrete
//! envelope with a flattened struct instead.

use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::errors::{ErrorCode, ErrorDetail};
use crate::models::{
    AddressCreate, AddressPage, AddressResult, AddressUpdate, Delivery, DeliveryPage,
    DeliveryStatus, DeliveryStatusUpdate, Order, OrderCreate, OrderProduct, OrderResult,
};

/// Discriminator of every envelope
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

macro_rules! envelope {
    ($(#[$doc:meta])* $name:ident, $data:ty) => {
        $(#[$doc])*
        #[derive(Debug, Serialize, ToSchema)]
        pub struct $name {
            pub status: EnvelopeStatus,
            /// Present when status is `success`
            pub data: Option<$data>,
            /// Present when status is `error`
            pub error: Option<ErrorDetail>,
        }
    };
}

envelope!(
    /// Envelope carrying an address
    AddressEnvelope, AddressResult
);
envelope!(
    /// Envelope carrying a page of addresses
    AddressPageEnvelope, AddressPage
);
envelope!(
    /// Envelope carrying the ID of a removed resource
    IdEnvelope, Uuid
);
envelope!(
    /// Envelope carrying an order
    OrderEnvelope, Order
);
envelope!(
    /// Envelope carrying a new order and its delivery
    OrderResultEnvelope, OrderResult
);
envelope!(
    /// Envelope carrying a delivery
    DeliveryEnvelope, Delivery
);
envelope!(
    /// Envelope carrying a page of deliveries
    DeliveryPageEnvelope, DeliveryPage
);

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Address Service",
        version = "0.1.0",
        description = "Delivery addresses. Also serves the internal getAddress operation used by other services."
    ),
    paths(
        crate::api::health::health,
        crate::api::address::create_address,
        crate::api::address::search_addresses,
        crate::api::address::get_address,
        crate::api::address::update_address,
        crate::api::address::delete_address,
    ),
    components(
        schemas(
            ErrorCode,
            ErrorDetail,
            EnvelopeStatus,
            AddressCreate,
            AddressUpdate,
            AddressResult,
            AddressPage,
            AddressEnvelope,
            AddressPageEnvelope,
            IdEnvelope,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "addresses", description = "Address management"),
    )
)]
pub struct AddressApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Order Service",
        version = "0.1.0",
        description = "Orders and their deliveries. Resolves addresses through the address service."
    ),
    paths(
        crate::api::health::health,
        crate::api::order::create_order,
        crate::api::order::get_order,
        crate::api::order::get_order_deliveries,
        crate::api::order::search_deliveries,
        crate::api::order::my_deliveries,
        crate::api::order::get_delivery,
        crate::api::order::update_delivery_status,
    ),
    components(
        schemas(
            ErrorCode,
            ErrorDetail,
            EnvelopeStatus,
            OrderProduct,
            OrderCreate,
            Order,
            OrderResult,
            Delivery,
            DeliveryStatus,
            DeliveryStatusUpdate,
            DeliveryPage,
            OrderEnvelope,
            OrderResultEnvelope,
            DeliveryEnvelope,
            DeliveryPageEnvelope,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "orders", description = "Order placement and lookup"),
        (name = "deliveries", description = "Delivery tracking"),
    )
)]
pub struct OrderApiDoc;
