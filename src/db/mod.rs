pub mod backend;
pub mod memory;

use std::sync::Arc;

pub use backend::{AddressRepository, DeliveryRepository, OrderRepository};
pub use memory::{InMemoryAddressRepository, InMemoryDeliveryRepository, InMemoryOrderRepository};

pub type AddressStore = Arc<dyn AddressRepository>;
pub type OrderStore = Arc<dyn OrderRepository>;
pub type DeliveryStore = Arc<dyn DeliveryRepository>;
