use std::env;

use thiserror::Error;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "globetrotter";
const JWT_TTL_HOURS: i64 = 24;
const MAX_JWT_TTL_HOURS: i64 = 24 * 365;

#[cfg(debug_assertions)]
const DEV_JWT_SECRET: &str = "globetrotter-dev-secret";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

/// Who may read a trip's analytics.
///
/// `Grant` requires the owner or a collaborator holding the `analytics`
/// permission. `View` folds analytics under the regular `view` capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsAccess {
    Grant,
    View,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub mongodb_uri: Option<String>,
    pub database: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub analytics_access: AnalyticsAccess,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| HOST.to_string());
        let port: u16 = parse_or("PORT", lookup("PORT"), PORT)?;
        if port == 0 {
            return Err(ConfigError::Invalid {
                name: "PORT",
                value: port.to_string(),
            });
        }

        let storage = match lookup("STORAGE").as_deref() {
            None | Some("mongo") => StorageBackend::Mongo,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE",
                    value: other.to_string(),
                })
            }
        };

        let mongodb_uri = lookup("MONGODB_URI");
        if storage == StorageBackend::Mongo && mongodb_uri.is_none() {
            return Err(ConfigError::Missing("MONGODB_URI"));
        }

        let database = lookup("MONGODB_DATABASE").unwrap_or_else(|| DATABASE.to_string());

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => default_jwt_secret()?,
        };

        let jwt_ttl_hours = parse_or("JWT_TTL_HOURS", lookup("JWT_TTL_HOURS"), JWT_TTL_HOURS)?;
        if !(1..=MAX_JWT_TTL_HOURS).contains(&jwt_ttl_hours) {
            return Err(ConfigError::Invalid {
                name: "JWT_TTL_HOURS",
                value: jwt_ttl_hours.to_string(),
            });
        }
        let bcrypt_cost = parse_or("BCRYPT_COST", lookup("BCRYPT_COST"), bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let analytics_access = match lookup("ANALYTICS_ACCESS").as_deref() {
            None | Some("grant") => AnalyticsAccess::Grant,
            Some("view") => AnalyticsAccess::View,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "ANALYTICS_ACCESS",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            storage,
            mongodb_uri,
            database,
            jwt_secret,
            jwt_ttl_hours,
            bcrypt_cost,
            analytics_access,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(debug_assertions)]
fn default_jwt_secret() -> Result<String, ConfigError> {
    log::warn!("JWT_SECRET not set, using the development secret");
    Ok(DEV_JWT_SECRET.to_string())
}

#[cfg(not(debug_assertions))]
fn default_jwt_secret() -> Result<String, ConfigError> {
    Err(ConfigError::Missing("JWT_SECRET"))
}
