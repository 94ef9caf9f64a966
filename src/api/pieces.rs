use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    constants::TOTAL_PIECES,
    error::Result,
    models::{ApiResponse, Piece},
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct PiecesResponse {
    pub pieces: Vec<Piece>,
    pub revealed: usize,
    pub total: u32,
    pub progress: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub wallet: Option<String>,
}

pub fn progress_label(revealed: usize) -> String {
    format!("{} / {} pieces revealed", revealed, TOTAL_PIECES)
}

fn pieces_response(pieces: Vec<Piece>) -> PiecesResponse {
    let revealed = pieces.len();
    PiecesResponse {
        pieces,
        revealed,
        total: TOTAL_PIECES,
        progress: progress_label(revealed),
    }
}

/// GET /api/v1/pieces
pub async fn list_pieces(State(state): State<AppState>) -> Result<Json<ApiResponse<PiecesResponse>>> {
    let pieces = state.store.all_pieces().await?;
    Ok(Json(ApiResponse::success(pieces_response(pieces))))
}

/// GET /api/v1/pieces/search?wallet=
///
/// The term is matched as typed; an empty term matches every piece.
pub async fn search_pieces(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<PiecesResponse>>> {
    let fragment = query.wallet.unwrap_or_default();
    let pieces = state.store.pieces_matching(&fragment).await?;
    Ok(Json(ApiResponse::success(pieces_response(pieces))))
}
