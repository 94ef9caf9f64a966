// src/models/mod.rs
pub mod records;

pub use records::{ApiResponse, LeaderboardEntry, LedgerTransaction, Piece, Transaction};
