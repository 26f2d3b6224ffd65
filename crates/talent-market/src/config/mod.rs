use crate::workflows::sourcing::{CachePolicy, LeaderboardDefaults, ScoringPreset, TimeWindow};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let preset = match env::var("APP_SCORING_PRESET") {
            Ok(value) => value
                .parse::<ScoringPreset>()
                .map_err(|_| ConfigError::InvalidPreset { value })?,
            Err(_) => ScoringPreset::default(),
        };

        let window = match env::var("APP_LEADERBOARD_WINDOW") {
            Ok(value) => value
                .parse::<TimeWindow>()
                .map_err(|_| ConfigError::InvalidWindow { value })?,
            Err(_) => TimeWindow::ThirtyDays,
        };

        let match_score_cache = match env::var("APP_MATCH_SCORE_TTL_SECS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map(CachePolicy::from_ttl_secs)
                .map_err(|_| ConfigError::InvalidCacheTtl { value })?,
            Err(_) => CachePolicy::Session,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig {
                preset,
                window,
                match_score_cache,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Leaderboard defaults and cache staleness.
#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    pub preset: ScoringPreset,
    pub window: TimeWindow,
    pub match_score_cache: CachePolicy,
}

impl ScoringConfig {
    pub fn defaults(&self) -> LeaderboardDefaults {
        LeaderboardDefaults {
            preset: self.preset,
            window: self.window,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPreset { value: String },
    InvalidWindow { value: String },
    InvalidCacheTtl { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPreset { value } => write!(
                f,
                "APP_SCORING_PRESET must be 'acceptance' or 'match_quality', got '{value}'"
            ),
            ConfigError::InvalidWindow { value } => write!(
                f,
                "APP_LEADERBOARD_WINDOW must be one of 7days, 30days, 90days, alltime, got '{value}'"
            ),
            ConfigError::InvalidCacheTtl { value } => write!(
                f,
                "APP_MATCH_SCORE_TTL_SECS must be a whole number of seconds, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidPreset { .. }
            | ConfigError::InvalidWindow { .. }
            | ConfigError::InvalidCacheTtl { .. } => None,
        }
    }
}
