//! Server configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use assetvault_common::Currency;
use assetvault_fx::{DEFAULT_RATE_SOURCE_URL, DEFAULT_RATE_TTL_SECS};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" | "pretty" => Ok(LogFormat::Text),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => f.write_str("json"),
            LogFormat::Text => f.write_str("text"),
        }
    }
}

/// Rate source configuration.
#[derive(Debug, Clone)]
pub struct RateConfig {
    /// Base URL of the currency-api endpoints.
    pub source_url: String,
    /// How long a fetched rate is reused.
    pub cache_ttl: Duration,
    /// Timeout for one remote rate request.
    pub request_timeout: Duration,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_RATE_SOURCE_URL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_RATE_TTL_SECS as u64),
            request_timeout: Duration::from_millis(10_000),
        }
    }
}

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// PostgreSQL URL. Without one, records live in memory.
    pub database_url: Option<String>,
    /// Pool size for the PostgreSQL store.
    pub database_max_connections: u32,
    /// Create the demo users when the store has none.
    pub seed_users: bool,
    /// Rate source configuration.
    pub rates: RateConfig,
    /// Currency the value endpoints report in.
    pub reference_currency: Currency,
    /// Per-request timeout for the HTTP API.
    pub request_timeout: Duration,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8080,
            database_url: None,
            database_max_connections: 5,
            seed_users: true,
            rates: RateConfig::default(),
            reference_currency: Currency::usd(),
            request_timeout: Duration::from_millis(30_000),
            log_format: LogFormat::Json,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unparseable values are ignored and the default kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("ASSETVAULT_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(port) = lookup("ASSETVAULT_LISTEN_PORT").and_then(|p| p.parse().ok()) {
            config.listen_port = port;
        }

        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            config.database_url = Some(url);
        }

        if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS").and_then(|m| m.parse().ok()) {
            config.database_max_connections = max;
        }

        if let Some(seed) = lookup("ASSETVAULT_SEED_USERS").and_then(|s| parse_bool(&s)) {
            config.seed_users = seed;
        }

        if let Some(url) = lookup("RATE_SOURCE_URL") {
            config.rates.source_url = url;
        }

        if let Some(secs) = lookup("RATE_CACHE_TTL_SECS").and_then(|s| s.parse().ok()) {
            config.rates.cache_ttl = Duration::from_secs(secs);
        }

        if let Some(ms) = lookup("RATE_REQUEST_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            config.rates.request_timeout = Duration::from_millis(ms);
        }

        if let Some(code) = lookup("REFERENCE_CURRENCY") {
            config.reference_currency = Currency::new(code);
        }

        if let Some(ms) = lookup("REQUEST_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            config.request_timeout = Duration::from_millis(ms);
        }

        if let Some(format) = lookup("LOG_FORMAT").and_then(|f| f.parse().ok()) {
            config.log_format = format;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.database_max_connections == 0 {
            return Err("Database pool needs at least one connection".to_string());
        }

        if !self.rates.source_url.starts_with("http://")
            && !self.rates.source_url.starts_with("https://")
        {
            return Err(format!("Invalid rate source URL: {}", self.rates.source_url));
        }

        if self.rates.cache_ttl.is_zero() {
            return Err("Rate cache TTL must be positive".to_string());
        }

        if self.rates.request_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err("Timeouts must be positive".to_string());
        }

        if self.reference_currency.code().is_empty() {
            return Err("Reference currency cannot be empty".to_string());
        }

        Ok(())
    }

    /// The `addr:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
