use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub payment: PaymentConfig,
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

        let question_bank_csv = env::var("APP_QUESTION_BANK_CSV")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        let report_price = env::var("APP_REPORT_PRICE")
            .unwrap_or_else(|_| DEFAULT_REPORT_PRICE.to_string())
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidPrice)?;
        if report_price == 0 {
            return Err(ConfigError::InvalidPrice);
        }

        let currency = env::var("APP_REPORT_CURRENCY")
            .unwrap_or_else(|_| DEFAULT_REPORT_CURRENCY.to_string())
            .trim()
            .to_ascii_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidCurrency { value: currency });
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig { question_bank_csv },
            payment: PaymentConfig {
                detailed_report_price: report_price,
                currency,
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

/// Where to load extra published questions from at startup.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub question_bank_csv: Option<PathBuf>,
}

const DEFAULT_REPORT_PRICE: u32 = 100;
const DEFAULT_REPORT_CURRENCY: &str = "AED";

/// Price charged to unlock the detailed report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfig {
    pub detailed_report_price: u32,
    pub currency: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            detailed_report_price: DEFAULT_REPORT_PRICE,
            currency: DEFAULT_REPORT_CURRENCY.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("APP_REPORT_PRICE must be a positive whole amount")]
    InvalidPrice,
    #[error("APP_REPORT_CURRENCY '{value}' is not a three letter code")]
    InvalidCurrency { value: String },
}
