//! In-memory repositories.
//!
//! Persistence is an external concern; these keep the services runnable and
//! testable without a database.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::backend::{AddressRepository, DeliveryRepository, OrderRepository};
use crate::models::{
    Address, AddressSearchCondition, Delivery, DeliverySearchCondition, DeliveryStatus, Order,
    Page, PageRequest,
};

#[derive(Default)]
pub struct InMemoryAddressRepository {
    addresses: RwLock<HashMap<Uuid, Address>>,
}

impl InMemoryAddressRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddressRepository for InMemoryAddressRepository {
    async fn insert(&self, address: Address) -> Result<Address> {
        let mut addresses = self.addresses.write().await;
        if addresses.contains_key(&address.id) {
            bail!("address {} already exists", address.id);
        }
        addresses.insert(address.id, address.clone());
        debug!(id = %address.id, "Stored address");
        Ok(address)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>> {
        Ok(self.addresses.read().await.get(&id).cloned())
    }

    async fn search(
        &self,
        condition: &AddressSearchCondition,
        page: PageRequest,
    ) -> Result<Page<Address>> {
        let mut matches: Vec<Address> = self
            .addresses
            .read()
            .await
            .values()
            .filter(|address| condition.matches(address))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(page.paginate(matches))
    }

    async fn update(&self, address: Address) -> Result<Option<Address>> {
        let mut addresses = self.addresses.write().await;
        Ok(addresses.get_mut(&address.id).map(|stored| {
            *stored = address.clone();
            address
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.addresses.write().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: Order) -> Result<Order> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            bail!("order {} already exists", order.id);
        }
        orders.insert(order.id, order.clone());
        debug!(id = %order.id, "Stored order");
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.orders.write().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryDeliveryRepository {
    deliveries: RwLock<HashMap<Uuid, Delivery>>,
}

impl InMemoryDeliveryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeliveryRepository for InMemoryDeliveryRepository {
    async fn insert(&self, delivery: Delivery) -> Result<Delivery> {
        let mut deliveries = self.deliveries.write().await;
        if deliveries.contains_key(&delivery.id) {
            bail!("delivery {} already exists", delivery.id);
        }
        deliveries.insert(delivery.id, delivery.clone());
        debug!(id = %delivery.id, order_id = %delivery.order_id, "Stored delivery");
        Ok(delivery)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Delivery>> {
        Ok(self.deliveries.read().await.get(&id).cloned())
    }

    async fn advance_status(
        &self,
        id: Uuid,
        from: DeliveryStatus,
        to: DeliveryStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Delivery>> {
        let mut deliveries = self.deliveries.write().await;
        Ok(deliveries
            .get_mut(&id)
            .filter(|stored| stored.status == from)
            .map(|stored| {
                stored.status = to;
                stored.updated_at = at;
                stored.clone()
            }))
    }

    async fn search(
        &self,
        condition: &DeliverySearchCondition,
        page: PageRequest,
    ) -> Result<Page<Delivery>> {
        let mut matches: Vec<Delivery> = self
            .deliveries
            .read()
            .await
            .values()
            .filter(|delivery| condition.matches(delivery))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(page.paginate(matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn delivery(order_id: Uuid, owner: i64, minutes_ago: i64) -> Delivery {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        Delivery {
            id: Uuid::new_v4(),
            order_id,
            order_owner_id: owner,
            address_id: Uuid::new_v4(),
            recipient: "Lee".to_string(),
            address_line: "1 Jongno".to_string(),
            zip_code: "03154".to_string(),
            status: DeliveryStatus::Waiting,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_delivery_queries() {
        let repo = InMemoryDeliveryRepository::new();
        let order_a = Uuid::new_v4();
        let order_b = Uuid::new_v4();

        let oldest = repo.insert(delivery(order_a, 1, 30)).await.unwrap();
        let newest = repo.insert(delivery(order_a, 1, 1)).await.unwrap();
        let other = repo.insert(delivery(order_b, 2, 10)).await.unwrap();

        let page = repo
            .find_all_by_order_id(PageRequest::default(), order_a)
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.data[0].id, newest.id);
        assert_eq!(page.data[1].id, oldest.id);

        let page = repo
            .find_all_by_order_owner_id(PageRequest::default(), 2)
            .await
            .unwrap();
        assert_eq!(page.data, vec![other.clone()]);

        assert_eq!(
            repo.find_by_id_and_order_owner_id(other.id, 2).await.unwrap(),
            Some(other.clone())
        );
        assert_eq!(
            repo.find_by_id_and_order_owner_id(other.id, 1).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_advance_status_is_compare_and_set() {
        let repo = InMemoryDeliveryRepository::new();
        let d = repo.insert(delivery(Uuid::new_v4(), 1, 0)).await.unwrap();
        let now = Utc::now();

        let moved = repo
            .advance_status(d.id, DeliveryStatus::Waiting, DeliveryStatus::InTransit, now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.status, DeliveryStatus::InTransit);

        // Same transition again: the status is no longer WAITING
        assert_eq!(
            repo.advance_status(d.id, DeliveryStatus::Waiting, DeliveryStatus::InTransit, now)
                .await
                .unwrap(),
            None
        );
        assert_eq!(
            repo.advance_status(Uuid::new_v4(), DeliveryStatus::Waiting, DeliveryStatus::InTransit, now)
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let repo = InMemoryDeliveryRepository::new();
        let d = delivery(Uuid::new_v4(), 1, 0);
        repo.insert(d.clone()).await.unwrap();
        assert!(repo.insert(d).await.is_err());
    }

    #[tokio::test]
    async fn test_update_missing_address_fails() {
        let repo = InMemoryAddressRepository::new();
        let now = Utc::now();
        let address = Address {
            id: Uuid::new_v4(),
            owner_id: 1,
            recipient: "Park".to_string(),
            address_line: "3 Sejong-daero".to_string(),
            zip_code: "04524".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(repo.update(address.clone()).await.unwrap(), None);
        repo.insert(address.clone()).await.unwrap();
        assert_eq!(repo.update(address.clone()).await.unwrap(), Some(address.clone()));
        assert!(repo.delete(address.id).await.unwrap());
        assert!(!repo.delete(address.id).await.unwrap());
    }
}
