use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Address, AddressSearchCondition, Delivery, DeliverySearchCondition, DeliveryStatus, Order,
    Page, PageRequest,
};

/// Address storage
#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn insert(&self, address: Address) -> Result<Address>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>>;

    /// Addresses matching `condition`, newest first
    async fn search(
        &self,
        condition: &AddressSearchCondition,
        page: PageRequest,
    ) -> Result<Page<Address>>;

    /// Replace a stored address; `None` when it no longer exists
    async fn update(&self, address: Address) -> Result<Option<Address>>;

    /// Returns false when nothing was stored under `id`
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Order storage
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: Order) -> Result<Order>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>>;

    /// Returns false when nothing was stored under `id`
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Delivery storage
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    async fn insert(&self, delivery: Delivery) -> Result<Delivery>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Delivery>>;

    /// Set the status to `to` only if it is still `from`, in one step.
    ///
    /// `None` when the delivery is gone or its status already moved.
    async fn advance_status(
        &self,
        id: Uuid,
        from: DeliveryStatus,
        to: DeliveryStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Delivery>>;

    /// Deliveries matching `condition`, newest first
    async fn search(
        &self,
        condition: &DeliverySearchCondition,
        page: PageRequest,
    ) -> Result<Page<Delivery>>;

    async fn find_all_by_order_id(&self, page: PageRequest, order_id: Uuid) -> Result<Page<Delivery>> {
        self.search(&DeliverySearchCondition::for_order(order_id), page)
            .await
    }

    async fn find_all_by_order_owner_id(
        &self,
        page: PageRequest,
        owner_id: i64,
    ) -> Result<Page<Delivery>> {
        self.search(&DeliverySearchCondition::for_owner(owner_id), page)
            .await
    }

    /// The delivery, only if its order belongs to `user_id`
    async fn find_by_id_and_order_owner_id(
        &self,
        delivery_id: Uuid,
        user_id: i64,
    ) -> Result<Option<Delivery>> {
        Ok(self
            .find_by_id(delivery_id)
            .await?
            .filter(|delivery| delivery.order_owner_id == user_id))
    }
}
