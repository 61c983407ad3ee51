/*!
 * API Types
 * Common types for the relay API layer
 */

use std::net::SocketAddr;
use thiserror::Error;

/// API operation result
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: SocketAddr,
    pub keepalive_interval_secs: u64,
    pub keepalive_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:50051".parse().unwrap(),
            keepalive_interval_secs: 60,
            keepalive_timeout_secs: 20,
        }
    }
}

impl ServerConfig {
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }
}
