/*
 *  display/color.rs
 *
 *  phatwx - weather on a pHAT
 *  (c) 2020-26 Stuart Hunter
 *
 *  Three colour ink palette shared by the composer and the panel drivers
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

use embedded_graphics::pixelcolor::PixelColor;
use serde::{Deserialize, Serialize};

/// Palette index used for any source colour the panel cannot show,
/// transparency included.
pub const UNMAPPED: u8 = 0xFF;

/// Squared RGB distance under which an icon pixel snaps to a panel colour.
const MATCH_TOLERANCE: u32 = 3 * 48 * 48;

/// Alpha below this is treated as see-through.
const ALPHA_CUTOFF: u8 = 128;

/// One of the three colours an e-ink pHAT can physically render.
///
/// The discriminants are the panel palette indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InkColor {
    /// Paper (index 0)
    White = 0,

    /// Dark ink (index 1)
    Black = 1,

    /// Red or yellow, depending on the panel (index 2)
    Accent = 2,
}

impl PixelColor for InkColor {
    type Raw = ();
}

impl InkColor {
    pub const ALL: [InkColor; 3] = [InkColor::White, InkColor::Black, InkColor::Accent];

    /// Palette index of this colour
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Colour for a palette index, `None` for anything outside the panel palette
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(InkColor::White),
            1 => Some(InkColor::Black),
            2 => Some(InkColor::Accent),
            _ => None,
        }
    }
}

/// Which accent pigment the attached panel carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColour {
    #[default]
    Red,
    Yellow,
}

impl AccentColour {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            AccentColour::Red => [255, 0, 0],
            AccentColour::Yellow => [255, 255, 0],
        }
    }
}

/// Concrete RGB values for the three inks of one panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: AccentColour,
}

impl Palette {
    pub fn new(accent: AccentColour) -> Self {
        Self { accent }
    }

    /// RGB value the panel shows for `color`
    pub fn rgb(&self, color: InkColor) -> [u8; 3] {
        match color {
            InkColor::White => [255, 255, 255],
            InkColor::Black => [0, 0, 0],
            InkColor::Accent => self.accent.rgb(),
        }
    }

    // Artwork is drawn with either pigment; both land on the accent ink.
    fn candidates(&self) -> [(InkColor, [u8; 3]); 4] {
        [
            (InkColor::White, self.rgb(InkColor::White)),
            (InkColor::Black, self.rgb(InkColor::Black)),
            (InkColor::Accent, AccentColour::Red.rgb()),
            (InkColor::Accent, AccentColour::Yellow.rgb()),
        ]
    }

    fn closest(&self, rgb: [u8; 3]) -> (InkColor, u32) {
        let mut best = (InkColor::White, u32::MAX);
        for (ink, reference) in self.candidates() {
            let d = distance_sq(rgb, reference);
            if d < best.1 {
                best = (ink, d);
            }
        }
        best
    }

    /// Closest panel ink for an opaque colour. Used to flatten backgrounds.
    pub fn nearest(&self, rgb: [u8; 3]) -> InkColor {
        self.closest(rgb).0
    }

    /// Palette index for an RGBA pixel of an icon.
    ///
    /// Returns [`UNMAPPED`] for see-through pixels and for colours that are
    /// not close to any panel ink.
    pub fn match_index(&self, rgba: [u8; 4]) -> u8 {
        if rgba[3] < ALPHA_CUTOFF {
            return UNMAPPED;
        }
        let (ink, d) = self.closest([rgba[0], rgba[1], rgba[2]]);
        if d <= MATCH_TOLERANCE { ink.index() } else { UNMAPPED }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(AccentColour::Red)
    }
}

fn distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for ink in InkColor::ALL {
            assert_eq!(InkColor::from_index(ink.index()), Some(ink));
        }
        assert_eq!(InkColor::from_index(3), None);
        assert_eq!(InkColor::from_index(UNMAPPED), None);
    }

    #[test]
    fn test_nearest_flattens_to_panel_inks() {
        let palette = Palette::default();
        assert_eq!(palette.nearest([250, 250, 250]), InkColor::White);
        assert_eq!(palette.nearest([20, 10, 30]), InkColor::Black);
        assert_eq!(palette.nearest([200, 30, 20]), InkColor::Accent);
    }

    #[test]
    fn test_match_index_rejects_transparent_and_foreign() {
        let palette = Palette::default();
        assert_eq!(palette.match_index([255, 255, 255, 255]), 0);
        assert_eq!(palette.match_index([0, 0, 0, 255]), 1);
        assert_eq!(palette.match_index([255, 0, 0, 255]), 2);
        assert_eq!(palette.match_index([0, 0, 0, 0]), UNMAPPED);
        // mid grey is nowhere near an ink
        assert_eq!(palette.match_index([128, 128, 128, 255]), UNMAPPED);
    }

    #[test]
    fn test_yellow_panel_accepts_red_artwork() {
        let palette = Palette::new(AccentColour::Yellow);
        assert_eq!(palette.rgb(InkColor::Accent), [255, 255, 0]);
        assert_eq!(palette.match_index([255, 0, 0, 255]), 2);
        assert_eq!(palette.match_index([255, 255, 0, 255]), 2);
    }
}
