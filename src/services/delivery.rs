use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::scope_owner;
use crate::db::DeliveryStore;
use crate::errors::{DomainError, ErrorCode};
use crate::models::{
    AddressResult, Delivery, DeliverySearchCondition, DeliveryStatus, Order, Page, PageRequest,
    Requester,
};

#[derive(Clone)]
pub struct DeliveryService {
    repository: DeliveryStore,
}

impl DeliveryService {
    pub fn new(repository: DeliveryStore) -> Self {
        Self { repository }
    }

    /// Open a delivery for a freshly stored order
    pub async fn create_for_order(
        &self,
        order: &Order,
        address: &AddressResult,
    ) -> Result<Delivery, DomainError> {
        let now = Utc::now();
        let delivery = Delivery {
            id: Uuid::new_v4(),
            order_id: order.id,
            order_owner_id: order.owner_id,
            address_id: address.id,
            recipient: address.recipient.clone(),
            address_line: address.address_line.clone(),
            zip_code: address.zip_code.clone(),
            status: DeliveryStatus::Waiting,
            created_at: now,
            updated_at: now,
        };

        let delivery = self.repository.insert(delivery).await?;
        info!(id = %delivery.id, order_id = %order.id, "Delivery created");
        Ok(delivery)
    }

    /// A delivery of one of the requester's orders
    pub async fn get(&self, requester: Requester, id: Uuid) -> Result<Delivery, DomainError> {
        if let Some(delivery) = self
            .repository
            .find_by_id_and_order_owner_id(id, requester.user_id)
            .await?
        {
            return Ok(delivery);
        }

        match self.repository.find_by_id(id).await? {
            Some(delivery) => Err(DomainError::unauthorized_requester(
                requester.user_id,
                delivery.order_owner_id,
            )),
            None => Err(not_found(id)),
        }
    }

    pub async fn list_mine(
        &self,
        requester: Requester,
        page: PageRequest,
    ) -> Result<Page<Delivery>, DomainError> {
        Ok(self
            .repository
            .find_all_by_order_owner_id(page, requester.user_id)
            .await?)
    }

    /// Deliveries of an order whose ownership the caller already checked
    pub async fn list_for_order(
        &self,
        order_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Delivery>, DomainError> {
        Ok(self.repository.find_all_by_order_id(page, order_id).await?)
    }

    /// Search among deliveries of the requester's orders
    pub async fn search(
        &self,
        requester: Requester,
        condition: &DeliverySearchCondition,
    ) -> Result<Page<Delivery>, DomainError> {
        let condition = DeliverySearchCondition {
            owner_id: Some(scope_owner(requester, condition.owner_id)?),
            ..condition.clone()
        };
        Ok(self
            .repository
            .search(&condition, condition.page_request())
            .await?)
    }

    /// Move a delivery one step forward.
    ///
    /// The check and the write happen as one compare-and-set, so of two
    /// concurrent identical moves only one succeeds.
    pub async fn update_status(
        &self,
        requester: Requester,
        id: Uuid,
        status: DeliveryStatus,
    ) -> Result<Delivery, DomainError> {
        let current = self.get(requester, id).await?;
        ensure_can_advance(current.status, status)?;

        match self
            .repository
            .advance_status(id, current.status, status, Utc::now())
            .await?
        {
            Some(delivery) => {
                info!(id = %delivery.id, status = ?delivery.status, "Delivery status updated");
                Ok(delivery)
            }
            None => match self.repository.find_by_id(id).await? {
                Some(moved) => Err(status_conflict(moved.status, status)),
                None => Err(not_found(id)),
            },
        }
    }
}

fn ensure_can_advance(from: DeliveryStatus, to: DeliveryStatus) -> Result<(), DomainError> {
    if from.can_advance_to(to) {
        Ok(())
    } else {
        Err(status_conflict(from, to))
    }
}

fn status_conflict(from: DeliveryStatus, to: DeliveryStatus) -> DomainError {
    DomainError::with_message(
        ErrorCode::InvalidInputValue,
        format!("Delivery status cannot change from {:?} to {:?}", from, to),
    )
}

fn not_found(id: Uuid) -> DomainError {
    DomainError::not_found(format!("Delivery not found: {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryDeliveryRepository;
    use std::sync::Arc;

    fn order(owner_id: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            owner_id,
            produce_company_id: Uuid::new_v4(),
            receive_company_id: Uuid::new_v4(),
            address_id: Uuid::new_v4(),
            products: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn address(id: Uuid) -> AddressResult {
        let now = Utc::now();
        AddressResult {
            id,
            owner_id: 1,
            recipient: "Jung Hoseok".to_string(),
            address_line: "8 Haeundae-ro, Busan".to_string(),
            zip_code: "48094".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    async fn seeded_into(service: &DeliveryService, owner_id: i64) -> Delivery {
        let order = order(owner_id);
        service
            .create_for_order(&order, &address(order.address_id))
            .await
            .unwrap()
    }

    async fn seeded(owner_id: i64) -> (DeliveryService, Delivery) {
        let service = DeliveryService::new(Arc::new(InMemoryDeliveryRepository::new()));
        let delivery = seeded_into(&service, owner_id).await;
        (service, delivery)
    }

    #[tokio::test]
    async fn test_create_copies_address() {
        let (_, delivery) = seeded(4).await;
        assert_eq!(delivery.status, DeliveryStatus::Waiting);
        assert_eq!(delivery.order_owner_id, 4);
        assert_eq!(delivery.zip_code, "48094");
    }

    #[tokio::test]
    async fn test_get_distinguishes_missing_from_foreign() {
        let (service, delivery) = seeded(4).await;

        assert_eq!(service.get(Requester::new(4), delivery.id).await.unwrap(), delivery);

        let foreign = service.get(Requester::new(8), delivery.id).await.unwrap_err();
        assert_eq!(foreign.message(), "Requester ID (8) does not match User ID (4)");

        let missing = service
            .get(Requester::new(4), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(missing.code(), ErrorCode::EntityNotFound);
    }

    #[tokio::test]
    async fn test_status_moves_forward_only() {
        let (service, delivery) = seeded(4).await;
        let owner = Requester::new(4);

        let err = service
            .update_status(owner, delivery.id, DeliveryStatus::Delivered)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInputValue);

        let moved = service
            .update_status(owner, delivery.id, DeliveryStatus::InTransit)
            .await
            .unwrap();
        assert_eq!(moved.status, DeliveryStatus::InTransit);
    }

    #[tokio::test]
    async fn test_concurrent_identical_moves_succeed_once() {
        let (service, delivery) = seeded(4).await;
        let owner = Requester::new(4);

        let (first, second) = tokio::join!(
            service.update_status(owner, delivery.id, DeliveryStatus::InTransit),
            service.update_status(owner, delivery.id, DeliveryStatus::InTransit),
        );
        assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);

        let loser = first.err().or(second.err()).unwrap();
        assert_eq!(loser.code(), ErrorCode::InvalidInputValue);
    }

    #[tokio::test]
    async fn test_search_is_scoped_to_requester() {
        let (service, delivery) = seeded(4).await;
        seeded_into(&service, 6).await;

        let page = service
            .search(Requester::new(4), &DeliverySearchCondition::default())
            .await
            .unwrap();
        assert_eq!(page.data, vec![delivery]);

        let err = service
            .search(Requester::new(4), &DeliverySearchCondition::for_owner(6))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Requester ID (4) does not match User ID (6)");
    }

    #[tokio::test]
    async fn test_list_mine() {
        let (service, delivery) = seeded(4).await;
        let page = service
            .list_mine(Requester::new(4), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.data, vec![delivery]);

        let empty = service
            .list_mine(Requester::new(5), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(empty.total, 0);
    }
}
