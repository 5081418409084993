//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger posting rules.
    #[serde(default)]
    pub ledger: LedgerConfig,
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
    /// Database connection URL (`postgres://...` or `sqlite://...`).
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

/// Rules applied when posting vouchers and deriving documents.
///
/// Built once at startup and handed to the services that need it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LedgerConfig {
    /// VAT rate applied to sales and purchase vouchers.
    #[serde(default = "default_vat_rate")]
    pub vat_rate: Decimal,
    /// Decimal places kept when rounding tax amounts (0 for KRW).
    #[serde(default)]
    pub tax_rounding_scale: u32,
    /// How many voucher numbers are tried before creation gives up.
    #[serde(default = "default_numbering_max_attempts")]
    pub numbering_max_attempts: u32,
    /// Expense account debited by depreciation vouchers.
    #[serde(default = "default_depreciation_expense_account")]
    pub depreciation_expense_account: String,
    /// Contra-asset account credited by depreciation vouchers.
    #[serde(default = "default_accumulated_depreciation_account")]
    pub accumulated_depreciation_account: String,
}

fn default_vat_rate() -> Decimal {
    Decimal::new(10, 2)
}

fn default_numbering_max_attempts() -> u32 {
    5
}

fn default_depreciation_expense_account() -> String {
    "818".to_string()
}

fn default_accumulated_depreciation_account() -> String {
    "209".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            vat_rate: default_vat_rate(),
            tax_rounding_scale: 0,
            numbering_max_attempts: default_numbering_max_attempts(),
            depreciation_expense_account: default_depreciation_expense_account(),
            accumulated_depreciation_account: default_accumulated_depreciation_account(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `HOEGYE__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("HOEGYE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
