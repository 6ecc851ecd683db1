//! # Startup Configuration
//!
//! All settings and secrets are read once at startup into [`AppConfig`] and
//! passed explicitly to the components that need them.

use std::env;

use axum::http::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, info};

use crate::utils::{constant::*, secret::get_secret};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("env variable `{0}` should be set")]
    Missing(&'static str),
    #[error("env variable `{name}` has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Backing store selected with the `STORE` variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug)]
pub struct AppConfig {
    pub port: u16,
    pub store: StoreKind,
    pub database_url: SecretString,
    pub token_secret: SecretString,
    pub cors_origin: HeaderValue,
    pub secure_cookie: bool,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] - the signing secret, or the database
    ///   credentials when using PostgreSQL, are absent
    /// - [`ConfigError::Invalid`] - a variable cannot be parsed
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let store = match lookup("STORE").map(|s| s.to_ascii_lowercase()).as_deref() {
            None | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE",
                    value: other.to_string(),
                });
            }
        };

        let token_secret = get_secret(&lookup, "ACCESS_TOKEN_SECRET_FILE", "ACCESS_TOKEN_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;

        let database_url = match get_secret(&lookup, "DATABASE_URL_FILE", "DATABASE_URL") {
            Some(url) => url,
            None if store == StoreKind::Memory => String::new(),
            None => {
                let user = lookup("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?;
                let pass = get_secret(&lookup, "DB_PASS_FILE", "DB_PASS")
                    .ok_or(ConfigError::Missing("DB_PASS"))?;
                let host = lookup("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string());
                let name = lookup("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
                debug!(%user, %host, %name, "Building database URL from parts");
                format!("postgres://{user}:{pass}@{host}/{name}")
            }
        };

        let origin = lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin = HeaderValue::from_str(&origin).map_err(|_| ConfigError::Invalid {
            name: "CORS_ORIGIN",
            value: origin.clone(),
        })?;

        let secure_cookie = match lookup("COOKIE_SECURE").as_deref() {
            None | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "COOKIE_SECURE",
                    value: other.to_string(),
                });
            }
        };

        info!(port, ?store, %origin, secure_cookie, "Configuration loaded");

        Ok(Self {
            port,
            store,
            database_url: SecretString::from(database_url),
            token_secret: SecretString::from(token_secret),
            cors_origin,
            secure_cookie,
        })
    }

    pub fn token_secret_bytes(&self) -> &[u8] {
        self.token_secret.expose_secret().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_SECRET", "s3cret"),
            ("DB_USER", "doctor"),
            ("DB_PASS", "pw"),
        ]))
        .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.store, StoreKind::Postgres);
        assert_eq!(config.cors_origin, DEFAULT_CORS_ORIGIN);
        assert!(!config.secure_cookie);
        assert_eq!(
            config.database_url.expose_secret(),
            "postgres://doctor:pw@localhost:5432/car_doctor"
        );
        assert_eq!(config.token_secret_bytes(), b"s3cret");
    }

    #[test]
    fn missing_secret_aborts_startup() {
        let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ACCESS_TOKEN_SECRET")));
    }

    #[test]
    fn postgres_requires_credentials() {
        let err = AppConfig::from_lookup(lookup_from(&[("ACCESS_TOKEN_SECRET", "s")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DB_USER")));
    }

    #[test]
    fn memory_store_needs_no_database() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_SECRET", "s"),
            ("STORE", "Memory"),
            ("PORT", "8080"),
            ("COOKIE_SECURE", "true"),
        ]))
        .unwrap();
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.port, 8080);
        assert!(config.secure_cookie);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_SECRET", "s"),
            ("STORE", "memory"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }
}
