//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Billing defaults.
    #[serde(default)]
    pub billing: BillingConfig,
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

/// Billing defaults applied when a request does not carry its own values.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Functional currency code all amounts are kept in.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Default tax-deducted-at-source rate (0.05 = 5%).
    #[serde(default = "default_tds_rate")]
    pub tds_rate: Decimal,
    /// Default VAT withholding rate.
    #[serde(default = "default_vat_rate")]
    pub vat_rate: Decimal,
    /// Day of the month bills fall due.
    #[serde(default = "default_due_day")]
    pub due_day: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            tds_rate: default_tds_rate(),
            vat_rate: default_vat_rate(),
            due_day: default_due_day(),
        }
    }
}

fn default_currency() -> String {
    "BDT".to_string()
}

fn default_tds_rate() -> Decimal {
    Decimal::new(5, 2)
}

fn default_vat_rate() -> Decimal {
    Decimal::new(15, 2)
}

fn default_due_day() -> u32 {
    10
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources are layered: `config/default`, `config/{RUN_MODE}`, then
    /// `RENTBOOK__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("RENTBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("RENTBOOK__DATABASE__URL", Some("postgres://localhost/rentbook")),
                ("RENTBOOK__SERVER__PORT", Some("9090")),
                ("RENTBOOK__BILLING__VAT_RATE", Some("0.10")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/rentbook");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.billing.vat_rate, dec!(0.10));
                assert_eq!(config.billing.tds_rate, dec!(0.05));
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars_unset(["RENTBOOK__DATABASE__URL"], || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_billing_defaults() {
        let billing = BillingConfig::default();
        assert_eq!(billing.currency, "BDT");
        assert_eq!(billing.tds_rate, dec!(0.05));
        assert_eq!(billing.vat_rate, dec!(0.15));
        assert_eq!(billing.due_day, 10);
    }
}
