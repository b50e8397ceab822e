use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::marketplace::listings::{ReviewPolicy, ReviewSettings, ScoringScheme};

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
    pub moderation: ModerationConfig,
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

        let scheme = match env::var("LISTING_SCORING_SCHEME") {
            Ok(raw) => raw
                .parse::<ScoringScheme>()
                .map_err(|_| ConfigError::InvalidScoringScheme(raw))?,
            Err(_) => ScoringScheme::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            moderation: ModerationConfig {
                scheme,
                allow_terminal_resubmission: flag("REVIEW_ALLOW_TERMINAL_RESUBMISSION")?,
                enforce_moderator_checklist: flag("REVIEW_ENFORCE_CHECKLIST")?,
            },
        })
    }
}

fn flag(name: &'static str) -> Result<bool, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(false),
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "" | "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { name, value: raw }),
        },
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

/// Listing review knobs exposed through the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModerationConfig {
    pub scheme: ScoringScheme,
    pub allow_terminal_resubmission: bool,
    pub enforce_moderator_checklist: bool,
}

impl ModerationConfig {
    pub fn review_settings(&self) -> ReviewSettings {
        ReviewSettings {
            scheme: self.scheme,
            policy: ReviewPolicy {
                allow_terminal_resubmission: self.allow_terminal_resubmission,
                enforce_moderator_checklist: self.enforce_moderator_checklist,
            },
            ..ReviewSettings::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidScoringScheme(String),
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidScoringScheme(value) => write!(
                f,
                "LISTING_SCORING_SCHEME must be 'balanced' or 'weighted' (found '{value}')"
            ),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be a boolean flag (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidScoringScheme(_)
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
