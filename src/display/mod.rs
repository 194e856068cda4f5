/*
 *  display/mod.rs
 *
 *  phatwx - weather on a pHAT
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - palette, panel boundary, drivers and the weather scene
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod factory;
pub mod color;

// Display drivers
pub mod drivers;

// UI components
pub mod components;

// Re-exports for convenience
pub use traits::{InkDisplay, DisplayCapabilities, SUPPORTED_RESOLUTIONS};
pub use error::{DisplayError, DisplayFactoryError};
pub use factory::{DisplayDriverFactory, BoxedDriver};
pub use color::{AccentColour, InkColor, Palette, UNMAPPED};
pub use components::WeatherScene;
pub use drivers::mock::MockDriver;
pub use drivers::png::PngDriver;
