/*
 *  display/traits.rs
 *
 *  phatwx - weather on a pHAT
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for the e-ink panel boundary
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

use crate::display::color::{AccentColour, InkColor, Palette};
use crate::display::error::DisplayError;
use crate::vframebuf::Canvas;

/// The only panel geometries the weather layout is drawn for
pub const SUPPORTED_RESOLUTIONS: [(u32, u32); 2] = [(212, 104), (250, 122)];

/// Display capabilities and metadata
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCapabilities {
    /// Display width in pixels
    pub width: u32,

    /// Display height in pixels
    pub height: u32,

    /// Accent pigment of the panel
    pub accent: AccentColour,

    /// Human readable panel name, for logging
    pub name: String,
}

impl DisplayCapabilities {
    pub fn new(width: u32, height: u32, accent: AccentColour, name: &str) -> Self {
        Self { width, height, accent, name: name.to_string() }
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The three colours all drawing is restricted to
    pub fn palette(&self) -> Palette {
        Palette::new(self.accent)
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_RESOLUTIONS.contains(&self.resolution())
    }

    /// Fails with [`DisplayError::UnsupportedResolution`] unless the panel is
    /// one of [`SUPPORTED_RESOLUTIONS`].
    pub fn ensure_supported(&self) -> Result<(), DisplayError> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(DisplayError::UnsupportedResolution { width: self.width, height: self.height })
        }
    }
}

/// Minimal panel abstraction - every sink the pipeline can push to implements this
///
/// The sequence used per run is `set_border`, `set_image`, `show`. The canvas
/// is moved into the driver; the composer keeps no reference to it.
pub trait InkDisplay {
    /// Returns the capabilities of this display
    fn capabilities(&self) -> &DisplayCapabilities;

    /// Returns the display dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        self.capabilities().resolution()
    }

    /// Colour of the frame around the active area
    fn set_border(&mut self, color: InkColor) -> Result<(), DisplayError>;

    /// Stage a full frame for the next `show()`
    fn set_image(&mut self, canvas: Canvas) -> Result<(), DisplayError>;

    /// Push the staged frame to the panel
    fn show(&mut self) -> Result<(), DisplayError>;
}

/// Shared size check for `set_image` implementations
pub fn check_dimensions(caps: &DisplayCapabilities, canvas: &Canvas) -> Result<(), DisplayError> {
    let actual = canvas.dimensions();
    if actual != caps.resolution() {
        return Err(DisplayError::DimensionMismatch { expected: caps.resolution(), actual });
    }
    Ok(())
}
