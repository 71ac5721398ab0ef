use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::delivery::DeliveryService;
use crate::contract::address::SharedAddressApi;
use crate::db::OrderStore;
use crate::errors::{ensure_same_company, ensure_same_requester, DomainError};
use crate::models::{Delivery, Order, OrderCreate, OrderResult, Page, PageRequest, Requester};

#[derive(Clone)]
pub struct OrderService {
    repository: OrderStore,
    deliveries: DeliveryService,
    addresses: SharedAddressApi,
}

impl OrderService {
    pub fn new(
        repository: OrderStore,
        deliveries: DeliveryService,
        addresses: SharedAddressApi,
    ) -> Self {
        Self {
            repository,
            deliveries,
            addresses,
        }
    }

    /// Place an order and open its delivery.
    ///
    /// Every product must come from the order's producing company, and the
    /// address is resolved through the address service contract.
    pub async fn create(
        &self,
        requester: Requester,
        request: OrderCreate,
    ) -> Result<OrderResult, DomainError> {
        if request.products.is_empty() {
            return Err(DomainError::invalid_input("An order needs at least one product"));
        }
        if let Some(product) = request.products.iter().find(|p| p.quantity == 0) {
            return Err(DomainError::invalid_input(format!(
                "Quantity of product {} must be positive",
                product.product_id
            )));
        }
        for product in &request.products {
            ensure_same_company(request.produce_company_id, product.company_id)?;
        }

        let address = self
            .addresses
            .get_address(request.address_id)
            .await
            .into_result()
            .map_err(|e| {
                warn!(address_id = %request.address_id, code = %e.code(), "Address lookup failed");
                e
            })?;

        let order = Order {
            id: Uuid::new_v4(),
            owner_id: requester.user_id,
            produce_company_id: request.produce_company_id,
            receive_company_id: request.receive_company_id,
            address_id: address.id,
            products: request.products,
            created_at: Utc::now(),
        };
        let order = self.repository.insert(order).await?;
        info!(id = %order.id, owner_id = order.owner_id, "Order created");

        match self.deliveries.create_for_order(&order, &address).await {
            Ok(delivery) => Ok(OrderResult { order, delivery }),
            Err(e) => {
                // An order without its delivery must not outlive the request
                match self.repository.delete(order.id).await {
                    Ok(_) => warn!(
                        id = %order.id,
                        code = %e.code(),
                        "Delivery creation failed, order withdrawn"
                    ),
                    Err(rollback) => error!(
                        id = %order.id,
                        error = %rollback,
                        "Delivery creation failed and the order could not be withdrawn"
                    ),
                }
                Err(e)
            }
        }
    }

    pub async fn get(&self, requester: Requester, id: Uuid) -> Result<Order, DomainError> {
        let order = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Order not found: {}", id)))?;
        ensure_same_requester(requester.user_id, order.owner_id)?;
        Ok(order)
    }

    pub async fn deliveries(
        &self,
        requester: Requester,
        order_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Delivery>, DomainError> {
        let order = self.get(requester, order_id).await?;
        self.deliveries.list_for_order(order.id, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::response::ApiResponse;
    use crate::contract::address::AddressInternalApi;
    use crate::db::{
        DeliveryRepository, InMemoryDeliveryRepository, InMemoryOrderRepository, OrderRepository,
    };
    use crate::errors::ErrorCode;
    use crate::models::{AddressResult, DeliverySearchCondition, DeliveryStatus, OrderProduct};
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::sync::{Arc, Mutex};

    /// Answers every lookup with the same envelope
    struct FixedAddressApi(ApiResponse<AddressResult>);

    #[async_trait]
    impl AddressInternalApi for FixedAddressApi {
        async fn get_address(&self, _id: Uuid) -> ApiResponse<AddressResult> {
            self.0.clone()
        }
    }

    /// Remembers the id of every order it stores
    #[derive(Default)]
    struct RecordingOrders {
        inner: InMemoryOrderRepository,
        inserted: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl OrderRepository for RecordingOrders {
        async fn insert(&self, order: Order) -> anyhow::Result<Order> {
            self.inserted.lock().unwrap().push(order.id);
            self.inner.insert(order).await
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Order>> {
            self.inner.find_by_id(id).await
        }

        async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
            self.inner.delete(id).await
        }
    }

    /// Refuses to store anything
    struct BrokenDeliveries;

    #[async_trait]
    impl DeliveryRepository for BrokenDeliveries {
        async fn insert(&self, _delivery: Delivery) -> anyhow::Result<Delivery> {
            anyhow::bail!("delivery store is offline")
        }

        async fn find_by_id(&self, _id: Uuid) -> anyhow::Result<Option<Delivery>> {
            Ok(None)
        }

        async fn advance_status(
            &self,
            _id: Uuid,
            _from: DeliveryStatus,
            _to: DeliveryStatus,
            _at: DateTime<Utc>,
        ) -> anyhow::Result<Option<Delivery>> {
            Ok(None)
        }

        async fn search(
            &self,
            _condition: &DeliverySearchCondition,
            page: PageRequest,
        ) -> anyhow::Result<Page<Delivery>> {
            Ok(page.paginate(Vec::new()))
        }
    }

    fn address() -> AddressResult {
        let now = Utc::now();
        AddressResult {
            id: Uuid::new_v4(),
            owner_id: 1,
            recipient: "Han Jisoo".to_string(),
            address_line: "21 Dongil-ro, Seoul".to_string(),
            zip_code: "01811".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn service(addresses: ApiResponse<AddressResult>) -> OrderService {
        OrderService::new(
            Arc::new(InMemoryOrderRepository::new()),
            DeliveryService::new(Arc::new(InMemoryDeliveryRepository::new())),
            Arc::new(FixedAddressApi(addresses)),
        )
    }

    fn request(company: Uuid, address_id: Uuid) -> OrderCreate {
        OrderCreate {
            produce_company_id: company,
            receive_company_id: Uuid::new_v4(),
            address_id,
            products: vec![OrderProduct {
                product_id: Uuid::new_v4(),
                company_id: company,
                quantity: 2,
            }],
        }
    }

    #[tokio::test]
    async fn test_create_order_opens_delivery() {
        let address = address();
        let service = service(ApiResponse::success(address.clone()));
        let result = service
            .create(Requester::new(1), request(Uuid::new_v4(), address.id))
            .await
            .unwrap();

        assert_eq!(result.order.owner_id, 1);
        assert_eq!(result.delivery.order_id, result.order.id);
        assert_eq!(result.delivery.address_id, address.id);
        assert_eq!(
            service.get(Requester::new(1), result.order.id).await.unwrap(),
            result.order
        );
    }

    #[tokio::test]
    async fn test_order_is_withdrawn_when_delivery_fails() {
        let address = address();
        let orders = Arc::new(RecordingOrders::default());
        let service = OrderService::new(
            orders.clone(),
            DeliveryService::new(Arc::new(BrokenDeliveries)),
            Arc::new(FixedAddressApi(ApiResponse::success(address.clone()))),
        );

        let err = service
            .create(Requester::new(1), request(Uuid::new_v4(), address.id))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InternalServerError);

        let inserted = orders.inserted.lock().unwrap().clone();
        assert_eq!(inserted.len(), 1);
        assert_eq!(orders.find_by_id(inserted[0]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_product_from_other_company_is_rejected() {
        let address = address();
        let service = service(ApiResponse::success(address.clone()));
        let order_company = Uuid::new_v4();
        let product_company = Uuid::new_v4();
        let mut request = request(order_company, address.id);
        request.products[0].company_id = product_company;

        let err = service.create(Requester::new(1), request).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::product_company_mismatch(order_company, product_company)
        );
    }

    #[tokio::test]
    async fn test_address_error_is_propagated_unchanged() {
        let remote = DomainError::with_message(
            ErrorCode::ServiceUnavailable,
            "address-service is temporarily unavailable",
        );
        let service = service(ApiResponse::error(remote.clone()));

        let err = service
            .create(Requester::new(1), request(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err, remote);
    }

    #[tokio::test]
    async fn test_empty_and_zero_quantity_orders() {
        let service = service(ApiResponse::success(address()));
        let mut empty = request(Uuid::new_v4(), Uuid::new_v4());
        empty.products.clear();
        assert_eq!(
            service.create(Requester::new(1), empty).await.unwrap_err().code(),
            ErrorCode::InvalidInputValue
        );

        let mut zero = request(Uuid::new_v4(), Uuid::new_v4());
        zero.products[0].quantity = 0;
        assert_eq!(
            service.create(Requester::new(1), zero).await.unwrap_err().code(),
            ErrorCode::InvalidInputValue
        );
    }

    #[tokio::test]
    async fn test_foreign_order_access() {
        let address = address();
        let service = service(ApiResponse::success(address.clone()));
        let result = service
            .create(Requester::new(1), request(Uuid::new_v4(), address.id))
            .await
            .unwrap();

        let err = service
            .deliveries(Requester::new(2), result.order.id, PageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Requester ID (2) does not match User ID (1)");

        let page = service
            .deliveries(Requester::new(1), result.order.id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.data, vec![result.delivery]);
    }
}
