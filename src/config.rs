use std::{env, net::IpAddr};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Config validation error: {0} is required")]
    Missing(&'static str),

    #[error("Config validation error: {key} {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error(
        "Config validation error: set NATS_SERVERS or PRODUCTS_MICROSERVICE_HOST and PRODUCTS_MICROSERVICE_PORT"
    )]
    MissingProductsTransport,
}

/// How the products service is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductsTransport {
    Nats { servers: Vec<String> },
    Http { host: String, port: u16 },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub products: ProductsTransport,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = parse_port("PORT", var("PORT").ok_or(ConfigError::Missing("PORT"))?)?;
        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = match var("APP_HOST") {
            Some(raw) => raw.trim().parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
                key: "APP_HOST",
                reason: format!("must be an IP address, got `{raw}`"),
            })?,
            None => IpAddr::from([127, 0, 0, 1]),
        };

        let products = match var("NATS_SERVERS") {
            Some(raw) => {
                let servers: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                if servers.is_empty() {
                    return Err(ConfigError::Invalid {
                        key: "NATS_SERVERS",
                        reason: "must list at least one server".into(),
                    });
                }
                ProductsTransport::Nats { servers }
            }
            None => match (
                var("PRODUCTS_MICROSERVICE_HOST"),
                var("PRODUCTS_MICROSERVICE_PORT"),
            ) {
                (Some(host), Some(port)) => ProductsTransport::Http {
                    host,
                    port: parse_port("PRODUCTS_MICROSERVICE_PORT", port)?,
                },
                (Some(_), None) => return Err(ConfigError::Missing("PRODUCTS_MICROSERVICE_PORT")),
                (None, Some(_)) => return Err(ConfigError::Missing("PRODUCTS_MICROSERVICE_HOST")),
                (None, None) => return Err(ConfigError::MissingProductsTransport),
            },
        };

        Ok(Self {
            database_url,
            host,
            port,
            products,
        })
    }
}

fn parse_port(key: &'static str, raw: String) -> Result<u16, ConfigError> {
    raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
        key,
        reason: format!("must be a valid port number, got `{raw}`"),
    })
}
