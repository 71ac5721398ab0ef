pub mod address;
pub mod delivery;
pub mod order;
pub mod page;
pub mod requester;

pub use address::{Address, AddressCreate, AddressResult, AddressSearchCondition, AddressUpdate};
pub use delivery::{Delivery, DeliverySearchCondition, DeliveryStatus, DeliveryStatusUpdate};
pub use order::{Order, OrderCreate, OrderProduct, OrderResult};
pub use page::{AddressPage, DeliveryPage, Page, PageParams, PageRequest};
pub use requester::Requester;
