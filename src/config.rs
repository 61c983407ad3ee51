/*!
 * Configuration
 * Environment-driven settings for the relay process
 */

use crate::core::limits::DEFAULT_QUEUE_CAPACITY;
use std::net::SocketAddr;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Process configuration, read once at startup.
///
/// Absent variables take defaults; malformed values fail startup rather
/// than silently falling back.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the completion endpoint (`OPENAI_API_KEY`).
    pub api_key: String,
    /// gRPC listen address (`RELAY_GRPC_ADDR`).
    pub listen_addr: SocketAddr,
    /// Completion endpoint URL (`RELAY_COMPLETION_URL`).
    pub completion_url: String,
    /// Completion model name (`RELAY_COMPLETION_MODEL`).
    pub completion_model: String,
    /// Capacity of both relay queues (`RELAY_QUEUE_CAPACITY`). Always
    /// bounded; raising it weakens backpressure, it never removes it.
    pub queue_capacity: usize,
    /// Client-side timeout for one completion call
    /// (`RELAY_REQUEST_TIMEOUT_SECS`).
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            listen_addr: "0.0.0.0:50051".parse().expect("default address is valid"),
            completion_url: "https://api.openai.com/v1/chat/completions".to_string(),
            completion_model: "gpt-3.5-turbo".to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            listen_addr: parse_var("RELAY_GRPC_ADDR", defaults.listen_addr)?,
            completion_url: std::env::var("RELAY_COMPLETION_URL")
                .unwrap_or(defaults.completion_url),
            completion_model: std::env::var("RELAY_COMPLETION_MODEL")
                .unwrap_or(defaults.completion_model),
            queue_capacity: parse_var("RELAY_QUEUE_CAPACITY", defaults.queue_capacity)?,
            request_timeout_secs: parse_var(
                "RELAY_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
        })
    }
}

fn parse_var<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
