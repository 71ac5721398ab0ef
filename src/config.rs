use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::circuit_breaker::CircuitBreakerConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub address_service: RemoteServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub instance_id: String,
}

/// Where and how to reach another service
#[derive(Debug, Clone)]
pub struct RemoteServiceConfig {
    pub name: String,
    pub base_url: String,
    pub timeout: Duration,
    pub circuit_breaker: CircuitBreakerConfig,
}

impl Config {
    /// Load configuration for a service listening on `default_port` unless
    /// `API_PORT` says otherwise.
    pub fn from_env(default_port: u16) -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: match env::var("API_PORT") {
                    Ok(port) => port
                        .parse()
                        .context("API_PORT must be a valid port number")?,
                    Err(_) => default_port,
                },
                // Used only for debugging/observability. If unset, fall back to HOSTNAME if
                // present (e.g. Docker/Kubernetes), otherwise "unknown".
                instance_id: env::var("INSTANCE_ID")
                    .or_else(|_| env::var("HOSTNAME"))
                    .unwrap_or_else(|_| "unknown".to_string()),
            },
            address_service: RemoteServiceConfig::from_env(
                "ADDRESS_SERVICE",
                "address-service",
                "http://localhost:8081",
            )?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl RemoteServiceConfig {
    /// Reads `<PREFIX>_URL` and `<PREFIX>_TIMEOUT_MS`
    pub fn from_env(prefix: &str, name: &str, default_url: &str) -> Result<Self> {
        let url_key = format!("{}_URL", prefix);
        let timeout_key = format!("{}_TIMEOUT_MS", prefix);

        let timeout_ms: u64 = env::var(&timeout_key)
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .with_context(|| format!("{} must be a valid number", timeout_key))?;

        Ok(Self {
            name: name.to_string(),
            base_url: env::var(&url_key)
                .unwrap_or_else(|_| default_url.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_millis(timeout_ms),
            circuit_breaker: CircuitBreakerConfig::from_env()?,
        })
    }

    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(5),
            circuit_breaker: CircuitBreakerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_address() {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                instance_id: "test-instance".to_string(),
            },
            address_service: RemoteServiceConfig::new("address-service", "http://localhost:8081"),
        };

        assert_eq!(config.server_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_remote_base_url_is_trimmed() {
        let remote = RemoteServiceConfig::new("address-service", "http://address:8081/");
        assert_eq!(remote.base_url, "http://address:8081");
        assert_eq!(remote.timeout, Duration::from_secs(5));
    }
}
