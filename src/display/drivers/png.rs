/*
 *  display/drivers/png.rs
 *
 *  phatwx - weather on a pHAT
 *  (c) 2020-26 Stuart Hunter
 *
 *  Simulated panel: renders each refresh to a PNG file
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tiny_skia::{ColorU8, Pixmap};

use crate::display::color::InkColor;
use crate::display::error::DisplayError;
use crate::display::traits::{check_dimensions, DisplayCapabilities, InkDisplay};
use crate::vframebuf::Canvas;

/// Width of the border drawn around the active area, in pixels
pub const BORDER_PX: u32 = 4;

/// Writes the panel contents, border included, as a PNG using the panel palette
#[derive(Debug)]
pub struct PngDriver {
    capabilities: DisplayCapabilities,
    output: PathBuf,
    border: InkColor,
    staged: Option<Canvas>,
}

impl PngDriver {
    pub fn new(capabilities: DisplayCapabilities, output: &Path) -> Self {
        Self {
            capabilities,
            output: output.to_path_buf(),
            border: InkColor::White,
            staged: None,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Rasterise `canvas` inside the border as it would appear on the glass
    pub fn render(&self, canvas: &Canvas) -> Result<Pixmap, DisplayError> {
        let palette = self.capabilities.palette();
        let (w, h) = canvas.dimensions();
        let (pw, ph) = (w + 2 * BORDER_PX, h + 2 * BORDER_PX);
        let mut pixmap = Pixmap::new(pw, ph)
            .ok_or_else(|| DisplayError::Encoding(format!("cannot allocate {}x{} pixmap", pw, ph)))?;

        let to_pixel = |ink: InkColor| {
            let [r, g, b] = palette.rgb(ink);
            ColorU8::from_rgba(r, g, b, 255).premultiply()
        };

        let border = to_pixel(self.border);
        let pixels = pixmap.pixels_mut();
        for y in 0..ph {
            for x in 0..pw {
                let inside = x >= BORDER_PX && y >= BORDER_PX && x < w + BORDER_PX && y < h + BORDER_PX;
                let px = if inside {
                    canvas
                        .get_pixel(x - BORDER_PX, y - BORDER_PX)
                        .map(to_pixel)
                        .unwrap_or(border)
                } else {
                    border
                };
                pixels[(y * pw + x) as usize] = px;
            }
        }
        Ok(pixmap)
    }
}

impl InkDisplay for PngDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn set_border(&mut self, color: InkColor) -> Result<(), DisplayError> {
        self.border = color;
        Ok(())
    }

    fn set_image(&mut self, canvas: Canvas) -> Result<(), DisplayError> {
        check_dimensions(&self.capabilities, &canvas)?;
        self.staged = Some(canvas);
        Ok(())
    }

    fn show(&mut self) -> Result<(), DisplayError> {
        let canvas = self.staged.as_ref().ok_or(DisplayError::NoImage)?;
        let pixmap = self.render(canvas)?;
        let data = pixmap
            .encode_png()
            .map_err(|e| DisplayError::Encoding(e.to_string()))?;
        debug!("encoded {} bytes of PNG", data.len());
        fs::write(&self.output, data)?;
        info!("{} refreshed -> {}", self.capabilities.name, self.output.display());
        Ok(())
    }
}
