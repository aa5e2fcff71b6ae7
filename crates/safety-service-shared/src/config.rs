//! Service configuration read from the environment.
//!
//! # Environment Variables
//!
//! - `SAFETY_BELLS_PATH`: emergency bell JSON document (default `emergency_bells.json`)
//! - `SAFETY_HOTZONE_DB`: hotzone SQLite file (default `database/hotzone.db`)
//! - `SAFETY_COMMUNITY_DB`: community SQLite file (default `database/community.db`)
//! - `SAFETY_SEED_SAMPLES`: insert sample hotzones into an empty store (default `true`)
//! - `SERVICE_HOST`: bind address (default `0.0.0.0`)
//! - `SERVICE_PORT`: HTTP port (default `5001`)
//!
//! Values that fail to parse fall back to their defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_BELLS_PATH: &str = "emergency_bells.json";
pub const DEFAULT_HOTZONE_DB: &str = "database/hotzone.db";
pub const DEFAULT_COMMUNITY_DB: &str = "database/community.db";
pub const DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bells_path: PathBuf,
    pub hotzone_db: PathBuf,
    pub community_db: PathBuf,
    pub seed_samples: bool,
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bells_path: PathBuf::from(DEFAULT_BELLS_PATH),
            hotzone_db: PathBuf::from(DEFAULT_HOTZONE_DB),
            community_db: PathBuf::from(DEFAULT_COMMUNITY_DB),
            seed_samples: true,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            bells_path: lookup("SAFETY_BELLS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.bells_path),
            hotzone_db: lookup("SAFETY_HOTZONE_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.hotzone_db),
            community_db: lookup("SAFETY_COMMUNITY_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.community_db),
            seed_samples: lookup("SAFETY_SEED_SAMPLES")
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(defaults.seed_samples),
            host: lookup("SERVICE_HOST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.host),
            port: lookup("SERVICE_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServiceConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5001");
    }

    #[test]
    fn overrides_are_applied() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("SAFETY_BELLS_PATH", "/data/bells.json"),
            ("SAFETY_SEED_SAMPLES", "false"),
            ("SERVICE_HOST", "127.0.0.1"),
            ("SERVICE_PORT", "8080"),
        ]));
        assert_eq!(config.bells_path, PathBuf::from("/data/bells.json"));
        assert!(!config.seed_samples);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn unparseable_values_fall_back() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("SERVICE_PORT", "eighty"),
            ("SERVICE_HOST", "not-an-ip"),
        ]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
