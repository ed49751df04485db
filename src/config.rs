use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;

const DEFAULT_DATABASE_NAME: &str = "collegeFlowDB";
const DEFAULT_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Where the session token travels. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTransport {
    Header,
    Cookie,
}

impl FromStr for TokenTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "header" | "bearer" => Ok(TokenTransport::Header),
            "cookie" => Ok(TokenTransport::Cookie),
            other => Err(format!("expected 'header' or 'cookie', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" | "test" => Ok(Environment::Development),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// How a lookup by id or email that matches nothing is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissPolicy {
    /// `200` with a `null` body.
    Empty,
    /// `404` with an error message.
    NotFound,
}

impl FromStr for MissPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "empty" | "null" => Ok(MissPolicy::Empty),
            "not_found" | "not-found" | "404" => Ok(MissPolicy::NotFound),
            other => Err(format!("expected 'empty' or 'not_found', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub token_transport: TokenTransport,
    pub environment: Environment,
    pub allowed_origins: Vec<String>,
    pub miss_policy: MissPolicy,
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

        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => {
                let user = var("DB_USER").ok_or(ConfigError::Missing("DATABASE_URL or DB_USER"))?;
                let pass = var("DB_PASS").ok_or(ConfigError::Missing("DB_PASS"))?;
                let host = var("DB_HOST").ok_or(ConfigError::Missing("DB_HOST"))?;
                format!(
                    "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
                    user, pass, host
                )
            }
        };

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let allowed_origins = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let token_ttl_secs: i64 = parse_or(&var, "TOKEN_TTL_SECS", 3600)?;
        if token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_SECS",
                reason: "must be positive".to_string(),
            });
        }

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&var, "PORT", 5000)?,
            database_url,
            database_name: var("DATABASE_NAME").unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
            jwt_secret,
            token_ttl_secs,
            token_transport: parse_or(&var, "TOKEN_TRANSPORT", TokenTransport::Header)?,
            environment: parse_or(&var, "APP_ENV", Environment::Development)?,
            allowed_origins,
            miss_policy: parse_or(&var, "LOOKUP_MISS", MissPolicy::Empty)?,
        })
    }
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
