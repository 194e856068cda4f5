/*
 *  display/components/weather.rs
 *
 *  phatwx - weather on a pHAT
 *  (c) 2020-26 Stuart Hunter
 *
 *  Weather scene - backdrop, frame, readings and condition icon
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

use embedded_graphics::{
    mono_font::{iso_8859_1::FONT_10X20, MonoFont},
    prelude::*,
    primitives::Rectangle,
};
use log::debug;
use std::convert::Infallible;
use tiny_skia::Pixmap;

use crate::assets::{fit_background, IconAsset, IconSet};
use crate::condition::IconCategory;
use crate::display::color::InkColor;
use crate::display::traits::DisplayCapabilities;
use crate::draw::{draw_line, draw_pixel, draw_text};
use crate::vframebuf::Canvas;
use crate::weather::WeatherReading;

// frame: vertical divider, top rule, middle rule
const FRAME_LINES: [((i32, i32), (i32, i32)); 3] = [
    ((69, 36), (69, 81)),
    ((31, 35), (184, 35)),
    ((69, 58), (174, 58)),
];
const ACCENT_MARK: Point = Point::new(169, 58);

const TIME_POS: Point = Point::new(36, 12);
const TEMP_LABEL_POS: Point = Point::new(72, 34);
const TEMP_POS: Point = Point::new(92, 34);
const PRESSURE_LABEL_POS: Point = Point::new(72, 58);
const PRESSURE_POS: Point = Point::new(92, 58);

/// Top-left of the condition icon, also where the "?" placeholder goes
pub const ICON_POS: Point = Point::new(28, 36);

const FONT: &MonoFont = &FONT_10X20;
const PLACEHOLDER: &str = "?";

/// Ink for the temperature reading: `ink` below the threshold, accent at or above it
pub fn temperature_colour(temperature: f64, threshold: f64, ink: InkColor) -> InkColor {
    if temperature < threshold { ink } else { InkColor::Accent }
}

/// `18.50°`
pub fn format_temperature(temperature: f64) -> String {
    format!("{:.2}°", temperature)
}

/// Composes one full frame for a panel.
#[derive(Debug, Clone)]
pub struct WeatherScene {
    capabilities: DisplayCapabilities,
    ink: InkColor,
}

impl WeatherScene {
    /// `ink` is the primary colour for the frame and text
    pub fn new(capabilities: DisplayCapabilities, ink: InkColor) -> Self {
        Self { capabilities, ink }
    }

    /// Region the placeholder glyph occupies
    pub fn placeholder_area() -> Rectangle {
        Rectangle::new(ICON_POS, FONT.character_size)
    }

    /// Region the temperature text may occupy
    pub fn temperature_area() -> Rectangle {
        Rectangle::new(TEMP_POS, Size::new(FONT.character_size.width * 8, FONT.character_size.height))
    }

    /// Build the frame. The result is exactly the panel's size and holds
    /// panel inks only; it is handed over to the display by value.
    pub fn compose(
        &self,
        background: &Pixmap,
        icons: &IconSet,
        reading: &WeatherReading,
        category: IconCategory,
        timestamp: &str,
        warning_threshold: f64,
    ) -> Canvas {
        let (width, height) = self.capabilities.resolution();
        let mut canvas = fit_background(background, width, height, &self.capabilities.palette());

        let icon = icons.get(&category).filter(|_| category.is_known());
        let Ok(()) = self.draw_scene(&mut canvas, icon, reading, timestamp, warning_threshold);
        canvas
    }

    fn draw_scene(
        &self,
        canvas: &mut Canvas,
        icon: Option<&IconAsset>,
        reading: &WeatherReading,
        timestamp: &str,
        warning_threshold: f64,
    ) -> Result<(), Infallible> {
        for ((x0, y0), (x1, y1)) in FRAME_LINES {
            draw_line(canvas, Point::new(x0, y0), Point::new(x1, y1), self.ink, 1)?;
        }
        draw_pixel(canvas, ACCENT_MARK, InkColor::Accent)?;

        draw_text(canvas, timestamp, TIME_POS, FONT, self.ink)?;

        let temp_ink = temperature_colour(reading.temperature_celsius, warning_threshold, self.ink);
        draw_text(canvas, "T", TEMP_LABEL_POS, FONT, self.ink)?;
        draw_text(canvas, &format_temperature(reading.temperature_celsius), TEMP_POS, FONT, temp_ink)?;

        draw_text(canvas, "P", PRESSURE_LABEL_POS, FONT, self.ink)?;
        draw_text(canvas, &reading.pressure.to_string(), PRESSURE_POS, FONT, self.ink)?;

        match icon {
            Some(asset) => {
                debug!("Pasting {} icon at {:?}", asset.category, ICON_POS);
                paste_icon(canvas, asset, ICON_POS);
            }
            None => {
                debug!("No icon for condition {}, drawing placeholder", reading.condition_code);
                draw_text(canvas, PLACEHOLDER, ICON_POS, FONT, InkColor::Accent)?;
            }
        }
        Ok(())
    }
}

/// Copy the icon's masked pixels onto the canvas with its top-left at `at`
pub fn paste_icon(canvas: &mut Canvas, asset: &IconAsset, at: Point) {
    for y in 0..asset.image.height() {
        for x in 0..asset.image.width() {
            if !asset.mask.get(x, y) {
                continue;
            }
            if let Some(color) = asset.image.get(x, y).and_then(InkColor::from_index) {
                canvas.set_pixel(at + Point::new(x as i32, y as i32), color);
            }
        }
    }
}
