use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::page::PageRequest;

/// A stored delivery address
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub id: Uuid,
    pub owner_id: i64,
    pub recipient: String,
    pub address_line: String,
    pub zip_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/v1/addresses`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressCreate {
    pub recipient: String,
    pub address_line: String,
    pub zip_code: String,
}

/// Body of `PUT /api/v1/addresses/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AddressUpdate {
    pub recipient: Option<String>,
    pub address_line: Option<String>,
    pub zip_code: Option<String>,
}

/// Address as returned to callers, including other services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AddressResult {
    pub id: Uuid,
    pub owner_id: i64,
    pub recipient: String,
    pub address_line: String,
    pub zip_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Address> for AddressResult {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            owner_id: address.owner_id,
            recipient: address.recipient,
            address_line: address.address_line,
            zip_code: address.zip_code,
            created_at: address.created_at,
            updated_at: address.updated_at,
        }
    }
}

/// Filters for address search; every set field must match
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AddressSearchCondition {
    /// Only addresses owned by this user
    pub owner_id: Option<i64>,
    /// Exact zip code
    pub zip_code: Option<String>,
    /// Case-insensitive match on recipient or address line
    pub keyword: Option<String>,
    /// Page number (starts at 1)
    pub page: Option<usize>,
    /// Results per page (default 10, max 100)
    pub page_size: Option<usize>,
}

impl AddressSearchCondition {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    pub fn matches(&self, address: &Address) -> bool {
        if self.owner_id.is_some_and(|owner| owner != address.owner_id) {
            return false;
        }
        if let Some(zip) = &self.zip_code {
            if zip != &address.zip_code {
                return false;
            }
        }
        if let Some(keyword) = self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            let keyword = keyword.to_lowercase();
            return address.recipient.to_lowercase().contains(&keyword)
                || address.address_line.to_lowercase().contains(&keyword);
        }
        true
    }
}
