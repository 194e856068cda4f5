//! Module for rasterising SVG artwork to an RGBA pixmap.
//!
//! This module uses `usvg` for SVG parsing and `resvg` for rendering.
//! Shapes are rendered with crisp edges so the artwork keeps the flat
//! colours the panel palette can match.

use resvg::{
    render,
    usvg::{
        Tree as ResvgTree,
        Options as ResvgUsvgOptions,
        ShapeRendering,
        Transform,
    }
}; // Use resvg's re-exports for usvg types

use tiny_skia::Pixmap;
use log::debug;
use std::error::Error;
use std::fmt;

/// Custom error type for SVG rendering operations.
#[derive(Debug)]
pub enum SvgImageError {
    /// Error parsing the SVG data.
    SvgParseError(String),
    /// Error creating a pixmap for rendering.
    PixmapCreationError(String),
}

impl fmt::Display for SvgImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvgImageError::SvgParseError(msg) => write!(f, "SVG parse error: {}", msg),
            SvgImageError::PixmapCreationError(msg) => write!(f, "Pixmap creation error: {}", msg),
        }
    }
}

impl Error for SvgImageError {}

/// Renders simple SVG data to RGBA.
#[derive(Debug)]
pub struct SvgImageRenderer {
    tree: ResvgTree,
}

impl SvgImageRenderer {
    /// Creates a new `SvgImageRenderer` from SVG string data.
    pub fn new(svg_data: &str) -> Result<Self, SvgImageError> {
        let usvg_options = ResvgUsvgOptions {
            shape_rendering: ShapeRendering::CrispEdges,
            ..ResvgUsvgOptions::default()
        };
        let tree = ResvgTree::from_str(svg_data, &usvg_options)
            .map_err(|e| SvgImageError::SvgParseError(format!("Failed to parse SVG: {:?}", e)))?;
        Ok(SvgImageRenderer { tree })
    }

    /// Intrinsic size of the document, rounded up to whole pixels
    pub fn size(&self) -> (u32, u32) {
        let size = self.tree.size();
        (size.width().ceil() as u32, size.height().ceil() as u32)
    }

    /// Render at the document's own size.
    pub fn render(&self) -> Result<Pixmap, SvgImageError> {
        let (w, h) = self.size();
        self.render_scaled(w, h)
    }

    /// Render scaled to `target_width` x `target_height`.
    pub fn render_scaled(&self, target_width: u32, target_height: u32) -> Result<Pixmap, SvgImageError> {
        let mut pixmap = Pixmap::new(target_width, target_height)
            .ok_or_else(|| SvgImageError::PixmapCreationError(
                format!("Failed to create {}x{} pixmap", target_width, target_height)
            ))?;

        // simple scale from (0,0), viewBox origin is already folded in by usvg
        let svg_size = self.tree.size();
        let scale_x = target_width as f32 / svg_size.width();
        let scale_y = target_height as f32 / svg_size.height();
        let transform = Transform::from_scale(scale_x, scale_y);

        render(&self.tree, transform, &mut pixmap.as_mut());
        debug!("SVG rendered at {}x{}", target_width, target_height);
        Ok(pixmap)
    }
}
