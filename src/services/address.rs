use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::{require_text, scope_owner};
use crate::api::response::ApiResponse;
use crate::contract::address::AddressInternalApi;
use crate::db::AddressStore;
use crate::errors::{ensure_same_requester, DomainError};
use crate::models::{
    Address, AddressCreate, AddressResult, AddressSearchCondition, AddressUpdate, Page, Requester,
};

#[derive(Clone)]
pub struct AddressService {
    repository: AddressStore,
}

impl AddressService {
    pub fn new(repository: AddressStore) -> Self {
        Self { repository }
    }

    pub async fn create(
        &self,
        requester: Requester,
        request: AddressCreate,
    ) -> Result<AddressResult, DomainError> {
        let now = Utc::now();
        let address = Address {
            id: Uuid::new_v4(),
            owner_id: requester.user_id,
            recipient: require_text("recipient", &request.recipient)?,
            address_line: require_text("address_line", &request.address_line)?,
            zip_code: require_text("zip_code", &request.zip_code)?,
            created_at: now,
            updated_at: now,
        };

        let address = self.repository.insert(address).await?;
        info!(id = %address.id, owner_id = address.owner_id, "Address created");
        Ok(address.into())
    }

    /// Any address; only other services reach this, through the internal route
    pub async fn get(&self, id: Uuid) -> Result<AddressResult, DomainError> {
        self.find(id).await.map(AddressResult::from)
    }

    /// An address owned by the requester
    pub async fn get_owned(
        &self,
        requester: Requester,
        id: Uuid,
    ) -> Result<AddressResult, DomainError> {
        let address = self.find(id).await?;
        ensure_same_requester(requester.user_id, address.owner_id)?;
        Ok(address.into())
    }

    /// Search among the requester's own addresses
    pub async fn search(
        &self,
        requester: Requester,
        condition: &AddressSearchCondition,
    ) -> Result<Page<AddressResult>, DomainError> {
        let condition = AddressSearchCondition {
            owner_id: Some(scope_owner(requester, condition.owner_id)?),
            ..condition.clone()
        };
        let page = self
            .repository
            .search(&condition, condition.page_request())
            .await?;
        Ok(page.map(AddressResult::from))
    }

    pub async fn update(
        &self,
        requester: Requester,
        id: Uuid,
        request: AddressUpdate,
    ) -> Result<AddressResult, DomainError> {
        let mut address = self.find(id).await?;
        ensure_same_requester(requester.user_id, address.owner_id)?;

        if let Some(recipient) = &request.recipient {
            address.recipient = require_text("recipient", recipient)?;
        }
        if let Some(address_line) = &request.address_line {
            address.address_line = require_text("address_line", address_line)?;
        }
        if let Some(zip_code) = &request.zip_code {
            address.zip_code = require_text("zip_code", zip_code)?;
        }
        address.updated_at = Utc::now();

        let address = self
            .repository
            .update(address)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(id = %address.id, "Address updated");
        Ok(address.into())
    }

    pub async fn delete(&self, requester: Requester, id: Uuid) -> Result<Uuid, DomainError> {
        let address = self.find(id).await?;
        ensure_same_requester(requester.user_id, address.owner_id)?;

        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        info!(id = %id, "Address deleted");
        Ok(id)
    }

    async fn find(&self, id: Uuid) -> Result<Address, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> DomainError {
    DomainError::not_found(format!("Address not found: {}", id))
}

#[async_trait]
impl AddressInternalApi for AddressService {
    async fn get_address(&self, id: Uuid) -> ApiResponse<AddressResult> {
        self.get(id).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{AddressRepository, InMemoryAddressRepository};
    use crate::errors::ErrorCode;
    use crate::models::PageRequest;
    use std::sync::Arc;

    /// Loses every row between a read and the write that follows it
    struct DeletedMidUpdate(InMemoryAddressRepository);

    #[async_trait]
    impl AddressRepository for DeletedMidUpdate {
        async fn insert(&self, address: Address) -> anyhow::Result<Address> {
            self.0.insert(address).await
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Address>> {
            self.0.find_by_id(id).await
        }

        async fn search(
            &self,
            condition: &AddressSearchCondition,
            page: PageRequest,
        ) -> anyhow::Result<Page<Address>> {
            self.0.search(condition, page).await
        }

        async fn update(&self, address: Address) -> anyhow::Result<Option<Address>> {
            self.0.delete(address.id).await?;
            self.0.update(address).await
        }

        async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
            self.0.delete(id).await
        }
    }

    fn service() -> AddressService {
        AddressService::new(Arc::new(InMemoryAddressRepository::new()))
    }

    fn create_request() -> AddressCreate {
        AddressCreate {
            recipient: " Choi Yuna ".to_string(),
            address_line: "55 Hangang-daero, Yongsan-gu".to_string(),
            zip_code: "04378".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let created = service
            .create(Requester::new(3), create_request())
            .await
            .unwrap();

        assert_eq!(created.owner_id, 3);
        assert_eq!(created.recipient, "Choi Yuna");
        assert_eq!(service.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let mut request = create_request();
        request.zip_code = "  ".to_string();
        let err = service()
            .create(Requester::new(3), request)
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidInputValue);
        assert_eq!(err.message(), "zip_code must not be blank");
    }

    #[tokio::test]
    async fn test_get_missing() {
        let id = Uuid::new_v4();
        let err = service().get(id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::EntityNotFound);
        assert_eq!(err.message(), format!("Address not found: {}", id));
    }

    #[tokio::test]
    async fn test_update_by_other_user_is_unauthorized() {
        let service = service();
        let created = service
            .create(Requester::new(5), create_request())
            .await
            .unwrap();

        let err = service
            .update(Requester::new(9), created.id, AddressUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Requester ID (9) does not match User ID (5)");
    }

    #[tokio::test]
    async fn test_update_and_delete_by_owner() {
        let service = service();
        let created = service
            .create(Requester::new(5), create_request())
            .await
            .unwrap();

        let updated = service
            .update(
                Requester::new(5),
                created.id,
                AddressUpdate {
                    zip_code: Some("04379".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.zip_code, "04379");
        assert_eq!(updated.recipient, created.recipient);

        assert_eq!(service.delete(Requester::new(5), created.id).await.unwrap(), created.id);
        assert_eq!(
            service.get(created.id).await.unwrap_err().code(),
            ErrorCode::EntityNotFound
        );
    }

    #[tokio::test]
    async fn test_search_by_owner() {
        let service = service();
        for owner in [1, 1, 2] {
            service
                .create(Requester::new(owner), create_request())
                .await
                .unwrap();
        }

        let page = service
            .search(Requester::new(1), &AddressSearchCondition::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(page.data.iter().all(|a| a.owner_id == 1));

        let err = service
            .search(
                Requester::new(1),
                &AddressSearchCondition {
                    owner_id: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Requester ID (1) does not match User ID (2)");
    }

    #[tokio::test]
    async fn test_update_of_concurrently_deleted_address_is_not_found() {
        let service = AddressService::new(Arc::new(DeletedMidUpdate(
            InMemoryAddressRepository::new(),
        )));
        let created = service
            .create(Requester::new(5), create_request())
            .await
            .unwrap();

        let err = service
            .update(Requester::new(5), created.id, AddressUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::EntityNotFound);
        assert_eq!(err.message(), format!("Address not found: {}", created.id));
    }

    #[tokio::test]
    async fn test_get_owned_checks_owner() {
        let service = service();
        let created = service
            .create(Requester::new(5), create_request())
            .await
            .unwrap();

        assert_eq!(
            service.get_owned(Requester::new(5), created.id).await.unwrap(),
            created
        );
        let err = service
            .get_owned(Requester::new(9), created.id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_internal_contract_wraps_result() {
        let service = service();
        let created = service
            .create(Requester::new(1), create_request())
            .await
            .unwrap();

        let found = service.get_address(created.id).await;
        assert_eq!(found.data(), Some(&created));

        let missing = service.get_address(Uuid::new_v4()).await;
        assert_eq!(
            missing.domain_error().map(DomainError::code),
            Some(ErrorCode::EntityNotFound)
        );
    }
}
