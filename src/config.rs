//! Runtime settings from the environment (optionally seeded from `.env.local` / `.env`).

use crate::logic::{RefereePool, DEFAULT_RECENT_LIMIT};
use crate::service::DEFAULT_TIMEOUT;
use std::time::Duration;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Missing environment variable {}", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub supabase_url: String,
    pub supabase_api_key: String,
    pub referee_pool: RefereePool,
    pub recent_results_limit: usize,
    /// Per-request timeout for backend calls.
    pub backend_timeout: Duration,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Settings {
    /// Load `.env.local` then `.env` (neither overrides variables already set), then read the
    /// process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(default_host);
        let port = match get("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: p })?,
            None => default_port(),
        };
        let supabase_url = get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let supabase_api_key =
            get("SUPABASE_API_KEY").ok_or(ConfigError::Missing("SUPABASE_API_KEY"))?;
        let referee_pool = match get("REFEREE_POOL") {
            None => RefereePool::default(),
            Some(v) if v.trim().eq_ignore_ascii_case("clubs") => RefereePool::Clubs,
            Some(v) => RefereePool::Roster(
                v.split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        };
        let recent_results_limit = match get("RECENT_RESULTS_LIMIT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "RECENT_RESULTS_LIMIT",
                value: v,
            })?,
            None => DEFAULT_RECENT_LIMIT,
        };
        let backend_timeout = match get("SUPABASE_TIMEOUT_SECS") {
            Some(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "SUPABASE_TIMEOUT_SECS",
                        value: v,
                    })
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            host,
            port,
            supabase_url,
            supabase_api_key,
            referee_pool,
            recent_results_limit,
            backend_timeout,
        })
    }
}
