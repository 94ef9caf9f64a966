//! Grid renderer.
//!
//! Paints the obscured base image over the whole surface and outlines the
//! unlocked cells that belong to the highlighted wallet. Cells are laid out
//! row-major: `piece_id = row * GRID_SIZE + col`.

pub mod surface;
pub mod svg;

use crate::{
    constants::{CANVAS_SIZE, GRID_SIZE, HIGHLIGHT_COLOR, HIGHLIGHT_LINE_WIDTH, PIECE_SIZE, TOTAL_PIECES},
    models::Piece,
};

pub use surface::{BaseImage, CellRect, Stroke, Surface};
pub use svg::SvgSurface;

/// Pixel rectangle of a cell, or `None` when `piece_id` is off the grid.
pub fn cell_rect(piece_id: i32) -> Option<CellRect> {
    let id = u32::try_from(piece_id).ok().filter(|id| *id < TOTAL_PIECES)?;
    let row = id / GRID_SIZE;
    let col = id % GRID_SIZE;
    Some(CellRect {
        x: col * PIECE_SIZE,
        y: row * PIECE_SIZE,
        width: PIECE_SIZE,
        height: PIECE_SIZE,
    })
}

fn normalize_highlight(highlight: Option<&str>) -> Option<String> {
    highlight
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_lowercase)
}

#[derive(Debug, Clone)]
pub struct GridRenderer {
    base_image: Option<BaseImage>,
    stroke: Stroke,
}

impl GridRenderer {
    pub fn new(base_image: Option<BaseImage>) -> Self {
        Self {
            base_image,
            stroke: Stroke {
                color: HIGHLIGHT_COLOR.to_string(),
                line_width: HIGHLIGHT_LINE_WIDTH,
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.base_image.is_some()
    }

    /// Redraws the full frame. Does nothing until a base image is set.
    pub fn render<S: Surface>(&self, surface: &mut S, pieces: &[Piece], highlight: Option<&str>) {
        let Some(image) = &self.base_image else {
            tracing::debug!("Base image not loaded; skipping render");
            return;
        };

        let (width, height) = surface.size();
        surface.clear();
        surface.draw_image(
            image,
            CellRect {
                x: 0,
                y: 0,
                width,
                height,
            },
        );

        let highlight = normalize_highlight(highlight);

        for piece in pieces {
            let Some(rect) = cell_rect(piece.piece_id) else {
                tracing::warn!("Skipping piece {} with off-grid id {}", piece.id, piece.piece_id);
                continue;
            };

            if let Some(wallet) = &highlight {
                if piece.wallet_address.to_lowercase() == *wallet {
                    surface.stroke_rect(rect, &self.stroke);
                }
            }
        }
    }

    /// Renders into a fresh canvas-sized SVG document.
    pub fn render_svg(&self, pieces: &[Piece], highlight: Option<&str>) -> String {
        let mut surface = SvgSurface::new(CANVAS_SIZE, CANVAS_SIZE);
        self.render(&mut surface, pieces, highlight);
        surface.to_document()
    }
}
