//! Server configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const PORT_VAR: &str = "SHIFT_ROTA_PORT";
pub const HOST_VAR: &str = "SHIFT_ROTA_HOST";
pub const STATIC_DIR_VAR: &str = "SHIFT_ROTA_STATIC_DIR";

pub const DEFAULT_PORT: u16 = 7860;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory served for any path the API does not handle.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unparseable values fall back to
    /// the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(PORT_VAR) {
            match raw.trim().parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => warn!(value = %raw, "Invalid {}, using {}", PORT_VAR, DEFAULT_PORT),
            }
        }
        if let Some(raw) = lookup(HOST_VAR) {
            match raw.trim().parse::<IpAddr>() {
                Ok(host) => config.host = host,
                Err(_) => warn!(value = %raw, "Invalid {}, using {}", HOST_VAR, config.host),
            }
        }

        config.static_dir = match lookup(STATIC_DIR_VAR) {
            Some(dir) => Some(PathBuf::from(dir)),
            None if Path::new("static").exists() => Some(PathBuf::from("static")),
            None => None,
        };

        config
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
