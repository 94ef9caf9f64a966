use serde::Deserialize;
use std::env;

use crate::constants::{
    DEFAULT_RECENT_TRANSACTIONS, DEFAULT_SEARCH_DEBOUNCE_MS, DEFAULT_SOLANA_RPC_URL,
    MAX_LEDGER_HISTORY_LIMIT,
};
use crate::utils::{is_env_flag_enabled, parse_wallet_address};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Store
    pub database_url: String,
    pub database_max_connections: u32,
    pub run_migrations: bool,

    // Ledger
    pub solana_rpc_url: String,
    pub target_wallet_address: String,

    // Grid
    pub base_image_url: Option<String>,
    pub search_debounce_ms: u64,
    pub recent_transactions_limit: usize,

    // CORS
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            run_migrations: is_env_flag_enabled("RUN_MIGRATIONS"),

            solana_rpc_url: env::var("SOLANA_RPC_URL")
                .unwrap_or_else(|_| DEFAULT_SOLANA_RPC_URL.to_string()),
            target_wallet_address: env::var("TARGET_WALLET_ADDRESS")?,

            base_image_url: env::var("BASE_IMAGE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            search_debounce_ms: env::var("SEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS),
            recent_transactions_limit: env::var("RECENT_TRANSACTIONS_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RECENT_TRANSACTIONS),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL is empty");
        }
        if url::Url::parse(&self.solana_rpc_url).is_err() {
            anyhow::bail!("SOLANA_RPC_URL is not a valid URL");
        }
        if parse_wallet_address(&self.target_wallet_address).is_err() {
            anyhow::bail!("TARGET_WALLET_ADDRESS is not a valid Solana public key");
        }
        if let Some(image) = &self.base_image_url {
            if url::Url::parse(image).is_err() {
                anyhow::bail!("BASE_IMAGE_URL is not a valid URL");
            }
        } else {
            tracing::warn!("BASE_IMAGE_URL is not set; grid renders will be empty");
        }
        if self.recent_transactions_limit == 0
            || self.recent_transactions_limit > MAX_LEDGER_HISTORY_LIMIT
        {
            anyhow::bail!(
                "RECENT_TRANSACTIONS_LIMIT must be between 1 and {}",
                MAX_LEDGER_HISTORY_LIMIT
            );
        }
        if self.search_debounce_ms == 0 {
            tracing::warn!("SEARCH_DEBOUNCE_MS is 0; every search keystroke triggers a render");
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    pub fn is_testnet(&self) -> bool {
        if self.environment == "development" || self.environment == "testnet" {
            return true;
        }
        let rpc = self.solana_rpc_url.to_ascii_lowercase();
        rpc.contains("testnet") || rpc.contains("devnet")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const TARGET: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

    pub(crate) fn test_config() -> Config {
        Config {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "development".to_string(),
            database_url: "postgres://localhost/solblur".to_string(),
            database_max_connections: 1,
            run_migrations: false,
            solana_rpc_url: DEFAULT_SOLANA_RPC_URL.to_string(),
            target_wallet_address: TARGET.to_string(),
            base_image_url: Some("https://cdn.example.com/blurred.jpg".to_string()),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            recent_transactions_limit: DEFAULT_RECENT_TRANSACTIONS,
            cors_allowed_origins: "*".to_string(),
        }
    }

    #[test]
    fn default_test_config_is_valid() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_malformed_target_wallet() {
        let mut config = test_config();
        config.target_wallet_address = "not-a-real-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_recent_limit() {
        let mut config = test_config();
        config.recent_transactions_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_base_image_is_allowed() {
        let mut config = test_config();
        config.base_image_url = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn testnet_detected_from_rpc_url() {
        let mut config = test_config();
        config.environment = "production".to_string();
        assert!(config.is_testnet());
        config.solana_rpc_url = "https://api.mainnet-beta.solana.com".to_string();
        assert!(!config.is_testnet());
    }
}
