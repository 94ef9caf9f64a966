use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    config::Config,
    error::Result,
    models::{LeaderboardEntry, Piece, Transaction},
};

#[cfg(test)]
pub mod memory;

/// Read-only queries against the hosted `pieces` / `transactions` tables.
#[async_trait]
pub trait PieceStore: Send + Sync {
    /// Every unlocked piece, newest first.
    async fn all_pieces(&self) -> Result<Vec<Piece>>;

    /// Pieces owned by exactly `address`.
    async fn pieces_for_wallet(&self, address: &str) -> Result<Vec<Piece>>;

    /// Pieces whose owner contains `fragment` (case-insensitive), newest first.
    async fn pieces_matching(&self, fragment: &str) -> Result<Vec<Piece>>;

    /// Payments made by exactly `address`, newest first.
    async fn transactions_for_wallet(&self, address: &str) -> Result<Vec<Transaction>>;

    /// Latest payments across all wallets, newest first.
    async fn all_transactions(&self, limit: i64) -> Result<Vec<Transaction>>;

    /// Per-wallet totals over every payment, highest first. Ties go to the
    /// wallet with the most recent payment.
    async fn wallet_totals(&self) -> Result<Vec<LeaderboardEntry>>;

    async fn ping(&self) -> bool;
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Escapes LIKE metacharacters so user input only matches literally.
pub(crate) fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    escaped.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

// ==================== PIECE QUERIES ====================
#[async_trait]
impl PieceStore for Database {
    async fn all_pieces(&self) -> Result<Vec<Piece>> {
        let pieces = sqlx::query_as::<_, Piece>(
            "SELECT id, piece_id, wallet_address, transaction_id, created_at
             FROM pieces
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(pieces)
    }

    async fn pieces_for_wallet(&self, address: &str) -> Result<Vec<Piece>> {
        let pieces = sqlx::query_as::<_, Piece>(
            "SELECT id, piece_id, wallet_address, transaction_id, created_at
             FROM pieces
             WHERE wallet_address = $1",
        )
        .bind(address)
        .fetch_all(&self.pool)
        .await?;
        Ok(pieces)
    }

    async fn pieces_matching(&self, fragment: &str) -> Result<Vec<Piece>> {
        let pieces = sqlx::query_as::<_, Piece>(
            "SELECT id, piece_id, wallet_address, transaction_id, created_at
             FROM pieces
             WHERE wallet_address ILIKE $1
             ORDER BY created_at DESC",
        )
        .bind(like_pattern(fragment))
        .fetch_all(&self.pool)
        .await?;
        Ok(pieces)
    }

    // ==================== TRANSACTION QUERIES ====================
    async fn transactions_for_wallet(&self, address: &str) -> Result<Vec<Transaction>> {
        let txs = sqlx::query_as::<_, Transaction>(
            "SELECT id, signature, wallet_address, amount, created_at
             FROM transactions
             WHERE wallet_address = $1
             ORDER BY created_at DESC",
        )
        .bind(address)
        .fetch_all(&self.pool)
        .await?;
        Ok(txs)
    }

    async fn all_transactions(&self, limit: i64) -> Result<Vec<Transaction>> {
        let txs = sqlx::query_as::<_, Transaction>(
            "SELECT id, signature, wallet_address, amount, created_at
             FROM transactions
             ORDER BY created_at DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(txs)
    }

    async fn wallet_totals(&self) -> Result<Vec<LeaderboardEntry>> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            "SELECT wallet_address,
                    COUNT(*) AS total_transactions,
                    COALESCE(SUM(amount), 0)::BIGINT AS total_amount
             FROM transactions
             GROUP BY wallet_address
             ORDER BY total_amount DESC, MAX(created_at) DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn ping(&self) -> bool {
        self.pool.acquire().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;

    #[tokio::test]
    async fn database_new_returns_error_on_invalid_url() {
        let mut config = test_config();
        config.database_url = "not-a-url".to_string();
        let result = Database::new(&config).await;
        assert!(result.is_err());
    }

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("a%b_c"), "%a\\%b\\_c%");
        assert_eq!(like_pattern(""), "%%");
    }
}
