//! Server settings read from the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{EngineError, EngineResult};

/// Default directory holding the payroll rate configuration.
pub const DEFAULT_CONFIG_DIR: &str = "./config/kr_payroll";

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Settings for the HTTP server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Directory passed to [`ConfigLoader::load`](super::ConfigLoader::load).
    pub config_dir: PathBuf,
    /// Socket address to listen on.
    pub bind_addr: SocketAddr,
}

impl ServerSettings {
    /// Reads settings from the process environment, loading `.env` first if present.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `PAYROLL_CONFIG_DIR` | `./config/kr_payroll` |
    /// | `PAYROLL_BIND_ADDR` | `0.0.0.0:3000` |
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_dir = lookup("PAYROLL_CONFIG_DIR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());

        let bind_addr = lookup("PAYROLL_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| EngineError::ConfigParseError {
                path: "PAYROLL_BIND_ADDR".to_string(),
                message: format!("'{}' is not a socket address: {}", bind_addr, e),
            })?;

        Ok(Self {
            config_dir: PathBuf::from(config_dir),
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = ServerSettings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.config_dir, PathBuf::from(DEFAULT_CONFIG_DIR));
        assert_eq!(settings.bind_addr, "0.0.0.0:3000".parse().unwrap());
    }

    #[test]
    fn test_overrides_are_used() {
        let settings = ServerSettings::from_lookup(lookup_from(&[
            ("PAYROLL_CONFIG_DIR", "/etc/payroll"),
            ("PAYROLL_BIND_ADDR", "127.0.0.1:8080"),
        ]))
        .unwrap();
        assert_eq!(settings.config_dir, PathBuf::from("/etc/payroll"));
        assert_eq!(settings.bind_addr.port(), 8080);
    }

    #[test]
    fn test_invalid_bind_addr_is_an_error() {
        let result = ServerSettings::from_lookup(lookup_from(&[("PAYROLL_BIND_ADDR", "not-an-addr")]));
        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert_eq!(path, "PAYROLL_BIND_ADDR");
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
