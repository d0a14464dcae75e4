use log::info;
use std::{env, fmt::Display, str::FromStr};
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "3000";
const DEFAULT_DATABASE_URL: &str = "sqlite://restaurant.db?mode=rwc";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{set} is set but {missing} is not")]
    Incomplete {
        set: &'static str,
        missing: &'static str,
    },
}

/// Credentials of the account seeded on startup
#[derive(Debug, Clone, PartialEq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub admin: Option<AdminCredentials>,
}

impl Config {
    /// Reads the configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let admin = match (lookup("ADMIN_USERNAME"), lookup("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminCredentials { username, password }),
            (Some(_), None) => {
                return Err(ConfigError::Incomplete {
                    set: "ADMIN_USERNAME",
                    missing: "ADMIN_PASSWORD",
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::Incomplete {
                    set: "ADMIN_PASSWORD",
                    missing: "ADMIN_USERNAME",
                });
            }
            (None, None) => None,
        };

        Ok(Self {
            host: try_load(&lookup, "HOST", DEFAULT_HOST)?,
            port: try_load(&lookup, "PORT", DEFAULT_PORT)?,
            database_url: try_load(&lookup, "DATABASE_URL", DEFAULT_DATABASE_URL)?,
            admin,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
