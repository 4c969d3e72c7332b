//! Server configuration read from the environment

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use taskboard_core::cache::{DEFAULT_CACHE_TIMEOUT, DEFAULT_LISTING_TTL};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = ".taskboard-data";
pub const DEFAULT_JWT_SECRET: &str = "dev-jwt-secret-change-me";
pub const DEFAULT_JWT_TTL_HOURS: i64 = 24;
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    File,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Redis,
    Memory,
    Disabled,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub store: StoreKind,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub cache: CacheKind,
    pub redis_url: String,
    pub cache_ttl: Duration,
    pub cache_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            store: StoreKind::File,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_ttl_hours: DEFAULT_JWT_TTL_HOURS,
            cache: CacheKind::Disabled,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            cache_ttl: DEFAULT_LISTING_TTL,
            cache_timeout: DEFAULT_CACHE_TIMEOUT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable lookup; unset, blank or
    /// unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let redis_url = var("REDIS_URL");
        let cache = match var("TASKBOARD_CACHE").map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("redis") => CacheKind::Redis,
            Some("memory") => CacheKind::Memory,
            Some("disabled") | Some("none") | Some("off") => CacheKind::Disabled,
            _ if redis_url.is_some() => CacheKind::Redis,
            _ => CacheKind::Disabled,
        };
        let store = match var("TASKBOARD_STORE").map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("memory") => StoreKind::Memory,
            _ => StoreKind::File,
        };

        Self {
            port: parse_or(var("PORT"), defaults.port),
            data_dir: var("TASKBOARD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            store,
            jwt_secret: var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            jwt_ttl_hours: parse_or(var("JWT_TTL_HOURS"), defaults.jwt_ttl_hours).max(1),
            cache,
            redis_url: redis_url.unwrap_or(defaults.redis_url),
            cache_ttl: var("CACHE_TTL_SECONDS")
                .and_then(|raw| raw.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            cache_timeout: var("CACHE_TIMEOUT_MS")
                .and_then(|raw| raw.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.cache_timeout),
        }
    }

    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|value| value.parse().ok()).unwrap_or(default)
}
