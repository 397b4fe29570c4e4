use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

/// Distinguishes runtime behavior for different stages of the client.
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
    pub valuation: ValuationServiceConfig,
    pub display: DisplayConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let raw_endpoint = env::var("VALUATION_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;
        let endpoint = parse_endpoint(&raw_endpoint)?;

        let timeout_secs = env::var("VALUATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let currency = env::var("VALUATION_CURRENCY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "MAD".to_string());

        let rounding = env::var("VALUATION_ROUNDING")
            .unwrap_or_else(|_| "10000".to_string())
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|step| *step > 0)
            .ok_or(ConfigError::InvalidRounding)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            valuation: ValuationServiceConfig {
                endpoint,
                timeout: Duration::from_secs(timeout_secs),
            },
            display: DisplayConfig { currency, rounding },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidEndpoint {
        value: raw.to_string(),
        source: Some(source),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::InvalidEndpoint {
            value: raw.to_string(),
            source: None,
        }),
    }
}

/// Location and time budget of the remote valuation service.
#[derive(Debug, Clone)]
pub struct ValuationServiceConfig {
    pub endpoint: Url,
    pub timeout: Duration,
}

/// Controls how a raw prediction is rendered for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    pub currency: String,
    pub rounding: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: "MAD".to_string(),
            rounding: 10_000,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingEndpoint,
    InvalidEndpoint {
        value: String,
        source: Option<url::ParseError>,
    },
    InvalidTimeout,
    InvalidRounding,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingEndpoint => {
                write!(f, "VALUATION_API_URL must be set to the valuation service URL")
            }
            ConfigError::InvalidEndpoint { value, .. } => {
                write!(
                    f,
                    "VALUATION_API_URL '{}' must be an absolute http or https URL",
                    value
                )
            }
            ConfigError::InvalidTimeout => {
                write!(f, "VALUATION_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::InvalidRounding => {
                write!(f, "VALUATION_ROUNDING must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidEndpoint {
                source: Some(source),
                ..
            } => Some(source),
            _ => None,
        }
    }
}
