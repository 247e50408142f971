use crate::assessment::SchemaVersion;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Distinguishes runtime behavior for different stages of the console.
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

/// Top-level configuration for the console.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub service: SiteServiceConfig,
    pub telemetry: TelemetryConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            service: SiteServiceConfig::from_env()?,
            telemetry: TelemetryConfig { log_level },
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

/// Where the remote site-scoring service lives and how the pipeline talks to it.
#[derive(Debug, Clone)]
pub struct SiteServiceConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub schema: SchemaVersion,
}

impl SiteServiceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            env::var("ERW_SERVICE_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());
        if let Err(err) = reqwest::Url::parse(&base_url) {
            return Err(ConfigError::InvalidServiceUrl {
                value: base_url,
                reason: err.to_string(),
            });
        }

        let timeout_secs = match env::var("ERW_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout { value: raw })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let schema = match env::var("ERW_PARAMETER_SCHEMA") {
            Ok(raw) => raw
                .parse::<SchemaVersion>()
                .map_err(|_| ConfigError::InvalidSchema { value: raw })?,
            Err(_) => SchemaVersion::default(),
        };

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            schema,
        })
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidServiceUrl {
        value: String,
        reason: String,
    },
    InvalidTimeout {
        value: String,
    },
    InvalidSchema {
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidServiceUrl { value, reason } => {
                write!(f, "ERW_SERVICE_URL '{value}' is not a valid URL ({reason})")
            }
            ConfigError::InvalidTimeout { value } => write!(
                f,
                "ERW_REQUEST_TIMEOUT_SECS '{value}' must be a positive number of seconds"
            ),
            ConfigError::InvalidSchema { value } => write!(
                f,
                "ERW_PARAMETER_SCHEMA '{value}' must be 'basic' or 'extended'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidServiceUrl { .. }
            | ConfigError::InvalidTimeout { .. }
            | ConfigError::InvalidSchema { .. } => None,
        }
    }
}
