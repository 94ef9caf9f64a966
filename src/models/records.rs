use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==================== PIECE ====================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Piece {
    pub id: i64,
    pub piece_id: i32,
    pub wallet_address: String,
    pub transaction_id: i64,
    pub created_at: DateTime<Utc>,
}

// ==================== TRANSACTION ====================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub signature: String,
    pub wallet_address: String,
    pub amount: i64, // lamports
    pub created_at: DateTime<Utc>,
}

// ==================== LEADERBOARD ====================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct LeaderboardEntry {
    pub wallet_address: String,
    pub total_transactions: i64,
    pub total_amount: i64,
}

// ==================== LEDGER ====================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerTransaction {
    pub signature: String,
    pub timestamp: DateTime<Utc>,
    pub amount: i64,
}

// ==================== API RESPONSE ====================
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
