//! Process configuration from environment (`.env` honoured via dotenvy in the binary).

use crate::error::ConfigError;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "mysql://root@localhost/coral";
pub const DEFAULT_SECRET_LENGTH: usize = 30;
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// Max accepted request body in bytes.
    pub body_limit: usize,
    /// Length of integration secrets generated on create and on reset.
    pub secret_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.into(),
            max_connections: 5,
            body_limit: DEFAULT_BODY_LIMIT,
            secret_length: DEFAULT_SECRET_LENGTH,
        }
    }
}

impl Config {
    /// Read `CORAL_*` and `DATABASE_*` variables; anything unset keeps its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        Ok(Config {
            host: parse_or(&lookup, "CORAL_HOST", defaults.host)?,
            port: parse_or(&lookup, "CORAL_PORT", defaults.port)?,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            body_limit: parse_or(&lookup, "CORAL_BODY_LIMIT", defaults.body_limit)?,
            secret_length: parse_or(&lookup, "CORAL_SECRET_LENGTH", defaults.secret_length)?,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
