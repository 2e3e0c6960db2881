//! # Storefront Configuration
//!
//! Settings loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ESHOPEE_DB_PATH=/tmp/eshopee.db                                    │
//! │     ESHOPEE_AUTH_DELAY_MS=0                                            │
//! │     ESHOPEE_TAX_RATE=8.25               (percent)                      │
//! │     ESHOPEE_FREE_SHIPPING_THRESHOLD=7500 (cents)                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/eshopee/storefront.toml (Linux)                          │
//! │     ~/Library/Application Support/com.eshopee.storefront/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     $50 free shipping, $9.99 standard, 8% tax, 1000 ms auth delay      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [storage]
//! path = "/var/lib/eshopee/storefront.db"
//! in_memory = false
//!
//! [auth]
//! simulated_delay_ms = 1000
//!
//! [checkout]
//! free_shipping_threshold_cents = 5000
//! standard_shipping_cents = 999
//! tax_rate_bps = 800
//!
//! [store]
//! name = "Eshopee"
//! currency_symbol = "$"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use eshopee_core::validation::validate_tax_rate_bps;
use eshopee_core::{CheckoutPolicy, Money, TaxRate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Where the local storage database lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Database file. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Keep everything in memory (nothing survives a restart).
    #[serde(default)]
    pub in_memory: bool,
}

/// Mock authentication backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_auth_delay_ms")]
    pub simulated_delay_ms: u64,
}

fn default_auth_delay_ms() -> u64 {
    1000
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            simulated_delay_ms: default_auth_delay_ms(),
        }
    }
}

/// Shipping and tax rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold_cents: i64,

    #[serde(default = "default_standard_shipping")]
    pub standard_shipping_cents: i64,

    /// 800 = 8%.
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
}

fn default_free_shipping_threshold() -> i64 {
    5000
}
fn default_standard_shipping() -> i64 {
    999
}
fn default_tax_rate_bps() -> u32 {
    800
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            free_shipping_threshold_cents: default_free_shipping_threshold(),
            standard_shipping_cents: default_standard_shipping(),
            tax_rate_bps: default_tax_rate_bps(),
        }
    }
}

/// Display settings for the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Eshopee".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Storefront Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub store: StoreSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml), if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading storefront config from file");
                Self::from_toml(&std::fs::read_to_string(&path)?)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing sections and keys take defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// A configuration for tests and throwaway sessions: in-memory storage
    /// and no simulated auth delay.
    pub fn ephemeral() -> Self {
        let mut config = Self::default();
        config.storage.in_memory = true;
        config.auth.simulated_delay_ms = 0;
        config
    }

    /// Checks value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_tax_rate_bps(self.checkout.tax_rate_bps)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.checkout.free_shipping_threshold_cents < 0 {
            return Err(ConfigError::Invalid(
                "free_shipping_threshold_cents must not be negative".into(),
            ));
        }

        if self.checkout.standard_shipping_cents < 0 {
            return Err(ConfigError::Invalid(
                "standard_shipping_cents must not be negative".into(),
            ));
        }

        if !self.storage.in_memory && self.database_path().is_none() {
            return Err(ConfigError::Invalid(
                "No database path configured and no data directory available".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `ESHOPEE_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("ESHOPEE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            if path == ":memory:" {
                self.storage.in_memory = true;
            } else {
                self.storage.path = Some(PathBuf::from(path));
                self.storage.in_memory = false;
            }
        }

        if let Some(delay) = lookup("ESHOPEE_AUTH_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => self.auth.simulated_delay_ms = ms,
                Err(_) => warn!(value = %delay, "Ignoring invalid ESHOPEE_AUTH_DELAY_MS"),
            }
        }

        if let Some(rate) = lookup("ESHOPEE_TAX_RATE") {
            match rate.parse::<f64>() {
                Ok(pct) if pct >= 0.0 => {
                    self.checkout.tax_rate_bps = TaxRate::from_percentage(pct).bps();
                }
                _ => warn!(value = %rate, "Ignoring invalid ESHOPEE_TAX_RATE"),
            }
        }

        if let Some(threshold) = lookup("ESHOPEE_FREE_SHIPPING_THRESHOLD") {
            match threshold.parse::<i64>() {
                Ok(cents) => self.checkout.free_shipping_threshold_cents = cents,
                Err(_) => warn!(
                    value = %threshold,
                    "Ignoring invalid ESHOPEE_FREE_SHIPPING_THRESHOLD"
                ),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "eshopee", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The database file: the configured path, else the platform data dir.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.storage.path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "eshopee", "storefront")
                .map(|dirs| dirs.data_dir().join("storefront.db"))
        })
    }

    pub fn checkout_policy(&self) -> CheckoutPolicy {
        CheckoutPolicy {
            free_shipping_threshold: Money::from_cents(self.checkout.free_shipping_threshold_cents),
            standard_shipping: Money::from_cents(self.checkout.standard_shipping_cents),
            tax_rate: TaxRate::from_bps(self.checkout.tax_rate_bps),
        }
    }

    pub fn auth_delay(&self) -> Duration {
        Duration::from_millis(self.auth.simulated_delay_ms)
    }

    /// Formats cents for display.
    ///
    /// ## Example
    /// ```rust
    /// use eshopee_storefront::state::StorefrontConfig;
    ///
    /// let config = StorefrontConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.store.currency_symbol,
            (cents / 100).abs(),
            (cents % 100).abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_match_checkout_rules() {
        let config = StorefrontConfig::default();
        assert_eq!(config.checkout_policy(), CheckoutPolicy::default());
        assert_eq!(config.auth_delay(), Duration::from_millis(1000));
        assert!(!config.storage.in_memory);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StorefrontConfig::from_toml(
            r#"
            [checkout]
            tax_rate_bps = 825

            [store]
            name = "Corner Shop"
            "#,
        )
        .unwrap();

        assert_eq!(config.checkout.tax_rate_bps, 825);
        assert_eq!(config.checkout.standard_shipping_cents, 999);
        assert_eq!(config.store.name, "Corner Shop");
        assert_eq!(config.store.currency_symbol, "$");
        assert_eq!(config.auth.simulated_delay_ms, 1000);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = StorefrontConfig::from_toml("[checkout\ntax_rate_bps = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_or_default_falls_back_on_broken_file() {
        let dir = std::env::temp_dir().join(format!("eshopee-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let broken = dir.join("broken.toml");
        std::fs::write(&broken, "[store\nname = ").unwrap();
        assert!(matches!(
            StorefrontConfig::load(Some(broken.clone())),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(
            StorefrontConfig::load_or_default(Some(broken)),
            StorefrontConfig::default()
        );

        let good = dir.join("storefront.toml");
        std::fs::write(&good, "[store]\nname = \"Corner Shop\"\n").unwrap();
        assert_eq!(
            StorefrontConfig::load_or_default(Some(good)).store.name,
            "Corner Shop"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            ("ESHOPEE_DB_PATH", "/tmp/shop.db"),
            ("ESHOPEE_AUTH_DELAY_MS", "0"),
            ("ESHOPEE_TAX_RATE", "8.25"),
            ("ESHOPEE_FREE_SHIPPING_THRESHOLD", "7500"),
        ]);
        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| vars.get(key).cloned());

        assert_eq!(config.database_path(), Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(config.auth_delay(), Duration::ZERO);
        assert_eq!(config.checkout.tax_rate_bps, 825);
        assert_eq!(config.checkout.free_shipping_threshold_cents, 7500);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let vars = env(&[
            ("ESHOPEE_AUTH_DELAY_MS", "soon"),
            ("ESHOPEE_TAX_RATE", "-3"),
            ("ESHOPEE_DB_PATH", ":memory:"),
        ]);
        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| vars.get(key).cloned());

        assert_eq!(config.auth.simulated_delay_ms, 1000);
        assert_eq!(config.checkout.tax_rate_bps, 800);
        assert!(config.storage.in_memory);
    }

    #[test]
    fn test_validation() {
        let mut config = StorefrontConfig::ephemeral();
        assert!(config.validate().is_ok());

        config.checkout.tax_rate_bps = 10_001;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.checkout.tax_rate_bps = 800;
        config.checkout.standard_shipping_cents = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_format_currency() {
        let config = StorefrontConfig::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(5), "$0.05");
        assert_eq!(config.format_currency(0), "$0.00");
        assert_eq!(config.format_currency(-1234), "-$12.34");
        assert_eq!(config.format_currency(250_000), "$2500.00");
    }
}
