//! In-memory `PieceStore` used by unit tests.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use super::PieceStore;
use crate::{
    error::{AppError, Result},
    models::{LeaderboardEntry, Piece, Transaction},
    services::leaderboard::aggregate,
};

#[derive(Default, Clone)]
pub struct MemoryStore {
    pub pieces: Vec<Piece>,
    pub transactions: Vec<Transaction>,
    pub fail: bool,
}

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, minute, 0).unwrap()
}

pub fn piece(id: i64, piece_id: i32, wallet: &str, minute: u32) -> Piece {
    Piece {
        id,
        piece_id,
        wallet_address: wallet.to_string(),
        transaction_id: id,
        created_at: at(minute),
    }
}

pub fn tx(id: i64, wallet: &str, amount: i64, minute: u32) -> Transaction {
    Transaction {
        id,
        signature: format!("sig-{}", id),
        wallet_address: wallet.to_string(),
        amount,
        created_at: at(minute),
    }
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(AppError::QueryFailed("store unavailable".to_string()));
        }
        Ok(())
    }
}

fn newest_first<T, F>(mut rows: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    rows
}

#[async_trait]
impl PieceStore for MemoryStore {
    async fn all_pieces(&self) -> Result<Vec<Piece>> {
        self.check()?;
        Ok(newest_first(self.pieces.clone(), |p| p.created_at))
    }

    async fn pieces_for_wallet(&self, address: &str) -> Result<Vec<Piece>> {
        self.check()?;
        Ok(self
            .pieces
            .iter()
            .filter(|p| p.wallet_address == address)
            .cloned()
            .collect())
    }

    async fn pieces_matching(&self, fragment: &str) -> Result<Vec<Piece>> {
        self.check()?;
        let needle = fragment.to_lowercase();
        let rows = self
            .pieces
            .iter()
            .filter(|p| p.wallet_address.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(newest_first(rows, |p| p.created_at))
    }

    async fn transactions_for_wallet(&self, address: &str) -> Result<Vec<Transaction>> {
        self.check()?;
        let rows = self
            .transactions
            .iter()
            .filter(|t| t.wallet_address == address)
            .cloned()
            .collect();
        Ok(newest_first(rows, |t| t.created_at))
    }

    async fn all_transactions(&self, limit: i64) -> Result<Vec<Transaction>> {
        self.check()?;
        let mut rows = newest_first(self.transactions.clone(), |t| t.created_at);
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn wallet_totals(&self) -> Result<Vec<LeaderboardEntry>> {
        self.check()?;
        let rows = newest_first(self.transactions.clone(), |t| t.created_at);
        Ok(aggregate(&rows))
    }

    async fn ping(&self) -> bool {
        !self.fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore {
            pieces: vec![
                piece(1, 10, "X", 1),
                piece(2, 11, "XY", 3),
                piece(3, 12, "aXb", 2),
                piece(4, 13, "Z", 4),
            ],
            transactions: vec![tx(1, "X", 100, 1), tx(2, "X", 200, 5), tx(3, "XY", 50, 2)],
            fail: false,
        }
    }

    #[tokio::test]
    async fn pieces_for_wallet_is_exact_match() {
        let pieces = store().pieces_for_wallet("X").await.unwrap();
        assert_eq!(pieces.len(), 1);
        assert!(pieces.iter().all(|p| p.wallet_address == "X"));
    }

    #[tokio::test]
    async fn pieces_matching_is_case_insensitive_substring_newest_first() {
        let pieces = store().pieces_matching("x").await.unwrap();
        let ids: Vec<i64> = pieces.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn transactions_for_wallet_is_exact_and_newest_first() {
        let txs = store().transactions_for_wallet("X").await.unwrap();
        let ids: Vec<i64> = txs.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn wallet_totals_cover_every_payment() {
        let totals = store().wallet_totals().await.unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].wallet_address, "X");
        assert_eq!(totals[0].total_amount, 300);
        assert_eq!(totals[0].total_transactions, 2);
        assert_eq!(totals[1].total_amount, 50);
    }

    #[tokio::test]
    async fn failing_store_reports_query_failed() {
        let result = MemoryStore::failing().all_pieces().await;
        assert!(matches!(result, Err(AppError::QueryFailed(_))));
    }
}
