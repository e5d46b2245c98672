use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::orientation::{DEFAULT_MATCH_COUNT, DEFAULT_SESSION_IDLE_TIMEOUT};

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
    pub catalog: CatalogConfig,
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

        let questions_csv = env::var("ORIENTATION_QUESTIONS_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_QUESTIONS_CSV));
        let programs_csv = env::var("ORIENTATION_PROGRAMS_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PROGRAMS_CSV));
        let results_csv = env::var("ORIENTATION_RESULTS_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let match_count = match env::var("ORIENTATION_MATCH_COUNT") {
            Ok(raw) => parse_match_count(&raw)?,
            Err(_) => DEFAULT_MATCH_COUNT,
        };
        let session_idle_timeout = match env::var("ORIENTATION_SESSION_IDLE_MINUTES") {
            Ok(raw) => parse_idle_minutes(&raw)?,
            Err(_) => DEFAULT_SESSION_IDLE_TIMEOUT,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig {
                questions_csv,
                programs_csv,
                results_csv,
                match_count,
                session_idle_timeout,
            },
        })
    }
}

pub const DEFAULT_QUESTIONS_CSV: &str = "data/questions.csv";
pub const DEFAULT_PROGRAMS_CSV: &str = "data/programs.csv";

fn parse_match_count(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(ConfigError::InvalidMatchCount),
    }
}

fn parse_idle_minutes(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(minutes) if minutes > 0 => minutes
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or(ConfigError::InvalidSessionIdle),
        _ => Err(ConfigError::InvalidSessionIdle),
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the questionnaire, program catalog and result log live.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub questions_csv: PathBuf,
    pub programs_csv: PathBuf,
    /// `None` keeps completed results in memory only.
    pub results_csv: Option<PathBuf>,
    pub match_count: usize,
    /// Untouched sessions are dropped after this long.
    pub session_idle_timeout: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMatchCount,
    InvalidSessionIdle,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMatchCount => {
                write!(f, "ORIENTATION_MATCH_COUNT must be a positive integer")
            }
            ConfigError::InvalidSessionIdle => {
                write!(
                    f,
                    "ORIENTATION_SESSION_IDLE_MINUTES must be a positive number of minutes"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidMatchCount
            | ConfigError::InvalidSessionIdle => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
