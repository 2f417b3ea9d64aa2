use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::cart::DEFAULT_CART_KEY;
use crate::session::DEFAULT_SESSION_TTL_SECS;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Media library database written by the sync jobs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("lundflix.db")
}

/// Session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Session key the request cart is stored under
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
    /// Seconds of inactivity after which a session is dropped
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cart_key: default_cart_key(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_cart_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

fn default_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

/// Sanitized config for API responses (filesystem paths hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: SanitizedDatabaseConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedDatabaseConfig {
    pub configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: SanitizedDatabaseConfig {
                configured: !config.database.path.as_os_str().is_empty(),
            },
            session: config.session.clone(),
        }
    }
}
