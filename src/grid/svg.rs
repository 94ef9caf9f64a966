use std::fmt::Write as _;

use super::surface::{BaseImage, CellRect, Stroke, Surface};

/// Surface that records draw calls as SVG elements.
pub struct SvgSurface {
    width: u32,
    height: u32,
    elements: Vec<String>,
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// Serializes the current frame into a standalone SVG document.
    pub fn to_document(&self) -> String {
        let mut doc = String::new();
        let _ = write!(
            doc,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        for element in &self.elements {
            doc.push_str(element);
        }
        doc.push_str("</svg>");
        doc
    }
}

impl Surface for SvgSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn draw_image(&mut self, image: &BaseImage, area: CellRect) {
        self.elements.push(format!(
            r#"<image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none"/>"#,
            escape_attr(&image.source),
            area.x,
            area.y,
            area.width,
            area.height
        ));
    }

    fn stroke_rect(&mut self, rect: CellRect, stroke: &Stroke) {
        self.elements.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            escape_attr(&stroke.color),
            stroke.line_width
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_surface_is_a_bare_document() {
        let surface = SvgSurface::new(1000, 1000);
        assert_eq!(
            surface.to_document(),
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="1000" height="1000" viewBox="0 0 1000 1000"></svg>"#
        );
    }

    #[test]
    fn image_source_is_escaped() {
        let mut surface = SvgSurface::new(10, 10);
        let image = BaseImage {
            source: "https://cdn.example.com/a.jpg?x=1&y=\"2\"".to_string(),
        };
        surface.draw_image(
            &image,
            CellRect {
                x: 0,
                y: 0,
                width: 10,
                height: 10,
            },
        );
        let doc = surface.to_document();
        assert!(doc.contains("x=1&amp;y=&quot;2&quot;"));
    }

    #[test]
    fn clear_drops_previous_frame() {
        let mut surface = SvgSurface::new(10, 10);
        let stroke = Stroke {
            color: "#9333ea".to_string(),
            line_width: 2,
        };
        surface.stroke_rect(
            CellRect {
                x: 0,
                y: 0,
                width: 1,
                height: 1,
            },
            &stroke,
        );
        assert!(surface.to_document().contains("<rect"));
        surface.clear();
        assert!(!surface.to_document().contains("<rect"));
    }
}
