use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::page::PageRequest;

/// Delivery progress; it only moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Waiting,
    InTransit,
    Delivered,
}

impl DeliveryStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Waiting => 0,
            Self::InTransit => 1,
            Self::Delivered => 2,
        }
    }

    /// True when `next` is the status directly after `self`
    pub fn can_advance_to(self, next: Self) -> bool {
        next.rank() == self.rank() + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Delivery {
    pub id: Uuid,
    pub order_id: Uuid,
    pub order_owner_id: i64,
    pub address_id: Uuid,
    pub recipient: String,
    pub address_line: String,
    pub zip_code: String,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `PATCH /api/v1/deliveries/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliveryStatusUpdate {
    pub status: DeliveryStatus,
}

/// Filters for delivery search; every set field must match
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeliverySearchCondition {
    pub order_id: Option<Uuid>,
    pub owner_id: Option<i64>,
    pub status: Option<DeliveryStatus>,
    pub zip_code: Option<String>,
    /// Page number (starts at 1)
    pub page: Option<usize>,
    /// Results per page (default 10, max 100)
    pub page_size: Option<usize>,
}

impl DeliverySearchCondition {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    pub fn for_order(order_id: Uuid) -> Self {
        Self {
            order_id: Some(order_id),
            ..Default::default()
        }
    }

    pub fn for_owner(owner_id: i64) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, delivery: &Delivery) -> bool {
        self.order_id.map_or(true, |id| id == delivery.order_id)
            && self.owner_id.map_or(true, |id| id == delivery.order_owner_id)
            && self.status.map_or(true, |status| status == delivery.status)
            && self
                .zip_code
                .as_ref()
                .map_or(true, |zip| zip == &delivery.zip_code)
    }
}
