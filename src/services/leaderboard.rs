use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::{LeaderboardEntry, Transaction},
    utils::{format_sol, shorten_address},
};

/// Groups payments by payer and ranks payers by total amount.
///
/// Every record is counted exactly once. The sort is stable, so wallets
/// with equal totals keep the order in which they first appeared.
pub fn aggregate(transactions: &[Transaction]) -> Vec<LeaderboardEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<LeaderboardEntry> = Vec::new();

    for tx in transactions {
        let slot = *index.entry(tx.wallet_address.as_str()).or_insert_with(|| {
            entries.push(LeaderboardEntry {
                wallet_address: tx.wallet_address.clone(),
                total_transactions: 0,
                total_amount: 0,
            });
            entries.len() - 1
        });

        let entry = &mut entries[slot];
        entry.total_transactions += 1;
        entry.total_amount = entry.total_amount.saturating_add(tx.amount);
    }

    entries.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
    entries
}

/// Leaderboard row as shown in the ranked table.
#[derive(Debug, Clone, Serialize)]
pub struct RankedRow {
    pub rank: usize,
    pub wallet_address: String,
    pub wallet_short: String,
    pub pieces: i64,
    pub total_lamports: i64,
    pub total_sol: String,
}

/// Row of the recent-transactions table.
#[derive(Debug, Clone, Serialize)]
pub struct RecentRow {
    pub signature: String,
    pub time: DateTime<Utc>,
    pub wallet_short: String,
    pub amount_lamports: i64,
    pub amount_sol: String,
}

pub fn ranked_rows(entries: &[LeaderboardEntry]) -> Vec<RankedRow> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| RankedRow {
            rank: index + 1,
            wallet_address: entry.wallet_address.clone(),
            wallet_short: shorten_address(&entry.wallet_address),
            pieces: entry.total_transactions,
            total_lamports: entry.total_amount,
            total_sol: format_sol(entry.total_amount),
        })
        .collect()
}

pub fn recent_rows(transactions: &[Transaction], limit: usize) -> Vec<RecentRow> {
    transactions
        .iter()
        .take(limit)
        .map(|tx| RecentRow {
            signature: tx.signature.clone(),
            time: tx.created_at,
            wallet_short: shorten_address(&tx.wallet_address),
            amount_lamports: tx.amount,
            amount_sol: format_sol(tx.amount),
        })
        .collect()
}
