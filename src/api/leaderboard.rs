use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;

use crate::{
    error::Result,
    models::{ApiResponse, LeaderboardEntry, Transaction},
    services::leaderboard::{aggregate, ranked_rows, recent_rows, RankedRow, RecentRow},
};

use super::{require_session, AppState};

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub scope: String,
    pub top_players: Vec<RankedRow>,
    pub recent_transactions: Vec<RecentRow>,
}

fn build_response(
    scope: &str,
    totals: &[LeaderboardEntry],
    txs: &[Transaction],
    recent_limit: usize,
) -> LeaderboardResponse {
    LeaderboardResponse {
        scope: scope.to_string(),
        top_players: ranked_rows(totals),
        recent_transactions: recent_rows(txs, recent_limit),
    }
}

/// GET /api/v1/leaderboard
pub async fn get_leaderboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<LeaderboardResponse>>> {
    let wallet_address = require_session(&headers, &state).await?;
    let txs = state.store.transactions_for_wallet(&wallet_address).await?;

    Ok(Json(ApiResponse::success(build_response(
        "wallet",
        &aggregate(&txs),
        &txs,
        state.config.recent_transactions_limit,
    ))))
}

/// GET /api/v1/leaderboard/global
///
/// Totals are summed in the store over every payment; only the recent list
/// is windowed.
pub async fn get_global_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LeaderboardResponse>>> {
    let recent_limit = state.config.recent_transactions_limit;
    let totals = state.store.wallet_totals().await?;
    let txs = state.store.all_transactions(recent_limit as i64).await?;

    Ok(Json(ApiResponse::success(build_response(
        "global",
        &totals,
        &txs,
        state.config.recent_transactions_limit,
    ))))
}
