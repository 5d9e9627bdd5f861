use std::{env, path::PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database: String,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database: "hse".to_string(),
            static_dir: PathBuf::from("./static"),
        }
    }
}

impl Config {
    /// Reads the process environment, after merging an optional `.env` file.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("loaded .env from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("PORT={port}")))?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup("HSE_HOST").unwrap_or(defaults.host),
            port,
            mongodb_uri: lookup("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            database: lookup("HSE_DATABASE").unwrap_or(defaults.database),
            static_dir: lookup("HSE_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn overrides_from_environment() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("HSE_DATABASE", "hse_site_b"),
            ("MONGODB_URI", "mongodb://db:27017/?replicaSet=rs0"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database, "hse_site_b");
        assert_eq!(config.mongodb_uri, "mongodb://db:27017/?replicaSet=rs0");
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn rejects_bad_port() {
        let error = Config::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(error, Error::Config(_)));
    }
}
