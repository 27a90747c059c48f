use crate::errors::{Error, Result};
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_DEVICE_API_KEY: &str = "expected-api-key";

#[derive(Debug, Clone)]
pub struct Config {
    pub http_addr: SocketAddr,
    /// Shared secret every gateway must send in `x-api-key`
    pub device_api_key: String,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let http_addr = lookup("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr: SocketAddr = http_addr
            .parse()
            .map_err(|e| Error::Config(format!("HTTP_ADDR {:?}: {}", http_addr, e)))?;

        let device_api_key =
            lookup("DEVICE_API_KEY").unwrap_or_else(|| DEFAULT_DEVICE_API_KEY.to_string());
        if device_api_key.is_empty() {
            return Err(Error::Config("DEVICE_API_KEY cannot be empty".to_string()));
        }

        let seed_demo_data = match lookup("SEED_DEMO_DATA") {
            None => true,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(Error::Config(format!(
                        "SEED_DEMO_DATA must be a boolean, got {:?}",
                        other
                    )))
                }
            },
        };

        Ok(Self {
            http_addr,
            device_api_key,
            seed_demo_data,
        })
    }
}
