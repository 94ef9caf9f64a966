pub mod solana_client;

use async_trait::async_trait;

use crate::{error::Result, models::LedgerTransaction};

pub use solana_client::SolanaClient;

/// Balance and history lookups against the ledger network.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Balance in whole SOL.
    async fn get_balance(&self, address: &str) -> Result<f64>;

    async fn get_recent_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<LedgerTransaction>>;
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use crate::error::AppError;
    use std::time::Duration;

    /// Canned ledger answers for tests.
    #[derive(Default, Clone)]
    pub struct FakeLedger {
        pub balance: Option<f64>,
        pub history: Vec<LedgerTransaction>,
        pub delay: Option<Duration>,
    }

    impl FakeLedger {
        pub fn with_balance(balance: f64) -> Self {
            Self {
                balance: Some(balance),
                ..Self::default()
            }
        }

        pub fn unreachable() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl Ledger for FakeLedger {
        async fn get_balance(&self, _address: &str) -> Result<f64> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.balance
                .ok_or_else(|| AppError::LedgerRpc("connection refused".to_string()))
        }

        async fn get_recent_transactions(
            &self,
            _address: &str,
            limit: usize,
        ) -> Result<Vec<LedgerTransaction>> {
            Ok(self.history.iter().take(limit).cloned().collect())
        }
    }
}
