//! Environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3030";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Where drawings are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Lost on restart.
    Memory,
    /// One JSON file per user.
    Directory(PathBuf),
}

impl StoreBackend {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "memory" => StoreBackend::Memory,
            path => StoreBackend::Directory(PathBuf::from(path)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub store: StoreBackend,
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3030)),
            store: StoreBackend::Memory,
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
        }
    }
}

impl ServerConfig {
    /// Read `BRAINSKETCH_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_raw = lookup("BRAINSKETCH_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "BRAINSKETCH_ADDR",
            value: addr_raw.clone(),
        })?;

        let store = lookup("BRAINSKETCH_STORE")
            .map(|value| StoreBackend::parse(&value))
            .unwrap_or(StoreBackend::Memory);

        Ok(Self {
            addr,
            store,
            connect_timeout: millis(
                &lookup,
                "BRAINSKETCH_CONNECT_TIMEOUT_MS",
                DEFAULT_CONNECT_TIMEOUT_MS,
            )?,
            query_timeout: millis(&lookup, "BRAINSKETCH_QUERY_TIMEOUT_MS", DEFAULT_QUERY_TIMEOUT_MS)?,
        })
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    match lookup(name) {
        None => Ok(Duration::from_millis(default)),
        Some(value) => value
            .trim()
            .parse()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
