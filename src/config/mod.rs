//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CHECKOUT_SHEETS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use checkout_sheets::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod error;
mod payment;
mod server;
mod sheets;

pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use sheets::SheetsConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Spreadsheet configuration (Google Sheets)
    pub sheets: SheetsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHECKOUT_SHEETS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CHECKOUT_SHEETS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CHECKOUT_SHEETS__SHEETS__SPREADSHEET_ID=...` -> `sheets.spreadsheet_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHECKOUT_SHEETS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Missing Google credentials are not an error here; requests that need
    /// them report it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        self.sheets.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[(&str, &str)] = &[
        ("CHECKOUT_SHEETS__PAYMENT__STRIPE_API_KEY", "sk_test_xxx"),
        ("CHECKOUT_SHEETS__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx"),
        ("CHECKOUT_SHEETS__PAYMENT__SUCCESS_URL", "https://shop.example.com/success"),
        ("CHECKOUT_SHEETS__PAYMENT__CANCEL_URL", "https://shop.example.com/cancel"),
        ("CHECKOUT_SHEETS__SHEETS__SPREADSHEET_ID", "ss_data"),
    ];

    const OPTIONAL_VARS: &[&str] = &[
        "CHECKOUT_SHEETS__SERVER__PORT",
        "CHECKOUT_SHEETS__SERVER__ENVIRONMENT",
        "CHECKOUT_SHEETS__SHEETS__DROP_DUPLICATE_CUSTOMER_NAME",
    ];

    fn set_minimal_env() {
        for (key, value) in VARS {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in VARS {
            env::remove_var(key);
        }
        for key in OPTIONAL_VARS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.payment.stripe_api_key.expose_secret(), "sk_test_xxx");
        assert_eq!(config.sheets.spreadsheet_id, "ss_data");
        assert!(config.sheets.credentials_json.is_none());
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.payment.currency, "usd");
        assert_eq!(config.payment.signature_tolerance_secs, 300);
        assert_eq!(config.sheets.data_sheet_name, "Sheet1");
        assert_eq!(config.sheets.form_config_range, "Form_Config!A2:K");
        assert_eq!(config.sheets.request_timeout_secs, 10);
        assert!(config.sheets.drop_duplicate_customer_name);
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CHECKOUT_SHEETS__SERVER__PORT", "3000");
        env::set_var("CHECKOUT_SHEETS__SERVER__ENVIRONMENT", "production");
        env::set_var("CHECKOUT_SHEETS__SHEETS__DROP_DUPLICATE_CUSTOMER_NAME", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert!(!config.sheets.drop_duplicate_customer_name);
    }

    #[test]
    fn test_missing_payment_section_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CHECKOUT_SHEETS__SHEETS__SPREADSHEET_ID", "ss_data");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
