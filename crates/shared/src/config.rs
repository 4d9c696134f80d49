//! Application configuration management.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::AppError;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Business calendar configuration.
    #[serde(default)]
    pub business: BusinessConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Business calendar configuration.
///
/// Release eligibility compares calendar dates, so "today" must be taken in
/// the firm's local timezone rather than UTC.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessConfig {
    /// IANA timezone name used to derive the business date.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "America/Mexico_City".to_string()
}

impl BusinessConfig {
    /// Parses the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the name is not a known IANA zone.
    pub fn tz(&self) -> Result<Tz, AppError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| AppError::Configuration(format!("invalid timezone {}: {e}", self.timezone)))
    }

    /// Returns the business date for the given instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured timezone is invalid.
    pub fn date_at(&self, now: DateTime<Utc>) -> Result<NaiveDate, AppError> {
        Ok(now.with_timezone(&self.tz()?).date_naive())
    }

    /// Returns today's business date.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured timezone is invalid.
    pub fn today(&self) -> Result<NaiveDate, AppError> {
        self.date_at(Utc::now())
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones: `config/default`,
    /// `config/{RUN_MODE}`, then `ALIANZA_*` environment variables with `__`
    /// separating nested keys (e.g. `ALIANZA_DATABASE__URL`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("ALIANZA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("ALIANZA_DATABASE__URL", Some("postgres://localhost/alianza_test")),
                ("ALIANZA_SERVER__PORT", Some("9090")),
                ("ALIANZA_BUSINESS__TIMEZONE", Some("UTC")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/alianza_test");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.business.timezone, "UTC");
            },
        );
    }

    #[test]
    fn test_load_requires_database_url() {
        temp_env::with_var_unset("ALIANZA_DATABASE__URL", || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_business_date_uses_timezone() {
        let business = BusinessConfig::default();
        // 03:00 UTC on April 1st is still March 31st in Mexico City.
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 3, 0, 0).unwrap();
        assert_eq!(
            business.date_at(now).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );

        let utc = BusinessConfig {
            timezone: "UTC".to_string(),
        };
        assert_eq!(
            utc.date_at(now).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        );
    }

    #[test]
    fn test_invalid_timezone_is_configuration_error() {
        let business = BusinessConfig {
            timezone: "Mars/Olympus".to_string(),
        };
        assert!(matches!(business.tz(), Err(AppError::Configuration(_))));
    }
}
