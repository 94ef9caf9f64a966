use serde::Serialize;

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stroke {
    pub color: String,
    pub line_width: u32,
}

/// The obscured picture painted under the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseImage {
    pub source: String,
}

/// Minimal 2D drawing target, modelled on a canvas context.
pub trait Surface {
    fn size(&self) -> (u32, u32);

    fn clear(&mut self);

    fn draw_image(&mut self, image: &BaseImage, area: CellRect);

    fn stroke_rect(&mut self, rect: CellRect, stroke: &Stroke);
}
