use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::info;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TTL_SECS: i64 = 60 * 60;
const MAX_TTL_SECS: i64 = 30 * 24 * 60 * 60;
const DEFAULT_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_DB_NAME: &str = "foodShareHub";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    Memory,
    Mongo { uri: String, database: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub access_token_secret: String,
    pub token_ttl_secs: i64,
    pub allowed_origins: Vec<String>,
    pub store: StoreConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let access_token_secret =
            var("ACCESS_TOKEN_SECRET").ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;

        let token_ttl_secs = parse_or(&var, "TOKEN_TTL_SECS", DEFAULT_TTL_SECS)?;
        if !(1..=MAX_TTL_SECS).contains(&token_ttl_secs) {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_SECS",
                reason: format!("must be between 1 and {MAX_TTL_SECS}"),
            });
        }

        let allowed_origins = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let store = match var("STORE_BACKEND").as_deref() {
            None | Some("mongo") => StoreConfig::Mongo {
                uri: mongo_uri(&var)?,
                database: var("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            },
            Some("memory") => StoreConfig::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORE_BACKEND",
                    reason: format!("unknown backend {other:?}"),
                })
            }
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&var, "PORT", DEFAULT_PORT)?,
            access_token_secret,
            token_ttl_secs,
            allowed_origins,
            store,
        })
    }
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn mongo_uri<F>(var: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uri) = var("MONGODB_URI") {
        return Ok(uri);
    }

    let user = var("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?;
    let pass = var("DB_PASS").ok_or(ConfigError::Missing("DB_PASS"))?;
    let host = var("DB_HOST").ok_or(ConfigError::Missing("DB_HOST"))?;

    Ok(format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
        urlencoding::encode(&user),
        urlencoding::encode(&pass),
        host
    ))
}
