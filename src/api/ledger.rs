use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    constants::MAX_LEDGER_HISTORY_LIMIT,
    error::{AppError, Result},
    models::{ApiResponse, LedgerTransaction},
};

use super::{require_session, AppState};

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LedgerHistoryResponse {
    pub wallet_address: String,
    pub transactions: Vec<LedgerTransaction>,
}

fn resolve_limit(requested: Option<usize>, default: usize) -> Result<usize> {
    let limit = requested.unwrap_or(default);
    if limit == 0 || limit > MAX_LEDGER_HISTORY_LIMIT {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_LEDGER_HISTORY_LIMIT
        )));
    }
    Ok(limit)
}

/// GET /api/v1/ledger/recent?limit=
pub async fn get_recent_ledger_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecentQuery>,
) -> Result<Json<ApiResponse<LedgerHistoryResponse>>> {
    let wallet_address = require_session(&headers, &state).await?;
    let limit = resolve_limit(query.limit, state.config.recent_transactions_limit)?;

    let transactions = state
        .ledger
        .get_recent_transactions(&wallet_address, limit)
        .await?;

    Ok(Json(ApiResponse::success(LedgerHistoryResponse {
        wallet_address,
        transactions,
    })))
}
