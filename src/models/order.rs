use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::delivery::Delivery;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderProduct {
    pub product_id: Uuid,
    /// Company that supplies the product
    pub company_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub owner_id: i64,
    /// Company producing every product in the order
    pub produce_company_id: Uuid,
    pub receive_company_id: Uuid,
    pub address_id: Uuid,
    pub products: Vec<OrderProduct>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/v1/orders`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderCreate {
    pub produce_company_id: Uuid,
    pub receive_company_id: Uuid,
    pub address_id: Uuid,
    pub products: Vec<OrderProduct>,
}

/// A freshly placed order together with the delivery created for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderResult {
    pub order: Order,
    pub delivery: Delivery,
}
