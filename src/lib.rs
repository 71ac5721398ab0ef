// Library exports for the service binaries and tests
pub mod api;
pub mod circuit_breaker;
pub mod client;
pub mod config;
pub mod contract;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod server;
pub mod services;
