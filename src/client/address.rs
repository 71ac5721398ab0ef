use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use super::ServiceClient;
use crate::api::response::ApiResponse;
use crate::config::RemoteServiceConfig;
use crate::contract::address::{AddressInternalApi, GET_ADDRESS};
use crate::models::AddressResult;

/// Calls the address service over HTTP
#[derive(Clone)]
pub struct RemoteAddressClient {
    client: ServiceClient,
}

impl RemoteAddressClient {
    pub fn new(config: &RemoteServiceConfig) -> Result<Self> {
        Ok(Self {
            client: ServiceClient::new(config)?,
        })
    }
}

#[async_trait]
impl AddressInternalApi for RemoteAddressClient {
    async fn get_address(&self, id: Uuid) -> ApiResponse<AddressResult> {
        self.client
            .call(&GET_ADDRESS, &[("id", &id.to_string())])
            .await
    }
}
