use axum::{extract::State, http::HeaderMap, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::Result,
    models::{ApiResponse, Piece},
};

use super::{require_session, AppState};

#[derive(Debug, Serialize)]
pub struct GalleryItem {
    pub id: i64,
    pub piece_id: i32,
    pub collected_at: DateTime<Utc>,
    pub collected_on: String,
}

#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub wallet_address: String,
    pub items: Vec<GalleryItem>,
    pub empty_message: Option<String>,
}

fn gallery_item(piece: &Piece) -> GalleryItem {
    GalleryItem {
        id: piece.id,
        piece_id: piece.piece_id,
        collected_at: piece.created_at,
        collected_on: piece.created_at.format("%Y-%m-%d").to_string(),
    }
}

/// GET /api/v1/gallery
pub async fn get_gallery(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<GalleryResponse>>> {
    let wallet_address = require_session(&headers, &state).await?;
    let pieces = state.store.pieces_for_wallet(&wallet_address).await?;

    let items: Vec<GalleryItem> = pieces.iter().map(gallery_item).collect();
    let empty_message = items.is_empty().then(|| {
        "You haven't collected any puzzle pieces yet. Send some SOL to get started!".to_string()
    });

    Ok(Json(ApiResponse::success(GalleryResponse {
        wallet_address,
        items,
        empty_message,
    })))
}
