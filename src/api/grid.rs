use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::error::Result;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct GridQuery {
    pub highlight: Option<String>,
}

/// GET /api/v1/grid.svg?highlight=
pub async fn get_grid_svg(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> Result<impl IntoResponse> {
    let pieces = state.store.all_pieces().await?;
    let svg = state
        .renderer
        .render_svg(&pieces, query.highlight.as_deref());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        svg,
    ))
}
