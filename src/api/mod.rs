pub mod address;
pub mod extract;
pub mod fallback;
pub mod health;
pub mod middleware;
pub mod openapi;
pub mod order;
pub mod response;
pub mod routes;

pub use response::ApiResponse;
