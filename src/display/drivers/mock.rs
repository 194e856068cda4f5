/*
 *  display/drivers/mock.rs
 *
 *  phatwx - weather on a pHAT
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock display driver for testing and dry runs without hardware
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

use log::info;

use crate::display::color::{AccentColour, InkColor};
use crate::display::error::DisplayError;
use crate::display::traits::{check_dimensions, DisplayCapabilities, InkDisplay};
use crate::vframebuf::Canvas;

/// Mock display driver
///
/// This driver simulates a panel without requiring hardware. It's useful for:
/// - Unit tests
/// - Integration tests
/// - Dry runs (`driver: mock`)
///
/// The mock driver records every call and keeps the frames it was handed
/// so tests can inspect them.
#[derive(Debug)]
pub struct MockDriver {
    capabilities: DisplayCapabilities,
    state: MockDriverState,
}

/// Recorded driver activity
#[derive(Debug, Default)]
pub struct MockDriverState {
    /// Last border colour set
    pub border: Option<InkColor>,

    /// Number of times set_image() was called
    pub set_image_count: usize,

    /// Number of times show() was called
    pub show_count: usize,

    /// Frame staged by the last set_image()
    pub staged: Option<Canvas>,

    /// Frame pushed by the last show()
    pub shown: Option<Canvas>,

    /// Simulate failures (for error testing)
    pub simulate_show_failure: bool,
}

impl MockDriver {
    pub fn new(capabilities: DisplayCapabilities) -> Self {
        Self { capabilities, state: MockDriverState::default() }
    }

    /// Create a mock driver with specific dimensions and a red accent
    pub fn new_with_size(width: u32, height: u32) -> Self {
        Self::new(DisplayCapabilities::new(width, height, AccentColour::Red, "mock"))
    }

    /// Recorded activity
    pub fn state(&self) -> &MockDriverState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MockDriverState {
        &mut self.state
    }

    /// Frame last pushed to the "panel"
    pub fn shown(&self) -> Option<&Canvas> {
        self.state.shown.as_ref()
    }
}

impl InkDisplay for MockDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn set_border(&mut self, color: InkColor) -> Result<(), DisplayError> {
        self.state.border = Some(color);
        Ok(())
    }

    fn set_image(&mut self, canvas: Canvas) -> Result<(), DisplayError> {
        check_dimensions(&self.capabilities, &canvas)?;
        self.state.set_image_count += 1;
        self.state.staged = Some(canvas);
        Ok(())
    }

    fn show(&mut self) -> Result<(), DisplayError> {
        if self.state.simulate_show_failure {
            return Err(DisplayError::Other("Simulated show failure".to_string()));
        }
        let frame = self.state.staged.clone().ok_or(DisplayError::NoImage)?;
        self.state.show_count += 1;
        info!("mock {}x{} panel refreshed", self.capabilities.width, self.capabilities.height);
        self.state.shown = Some(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_driver_creation() {
        let driver = MockDriver::new_with_size(212, 104);
        assert_eq!(driver.dimensions(), (212, 104));
        assert_eq!(driver.state().show_count, 0);
        assert!(driver.shown().is_none());
    }

    #[test]
    fn test_mock_driver_set_image_then_show() {
        let mut driver = MockDriver::new_with_size(212, 104);
        driver.set_border(InkColor::Black).unwrap();
        driver.set_image(Canvas::new(212, 104, InkColor::Accent)).unwrap();
        driver.show().unwrap();

        assert_eq!(driver.state().border, Some(InkColor::Black));
        assert_eq!(driver.state().set_image_count, 1);
        assert_eq!(driver.state().show_count, 1);
        assert_eq!(driver.shown().and_then(|c| c.get_pixel(0, 0)), Some(InkColor::Accent));
    }

    #[test]
    fn test_mock_driver_show_without_image() {
        let mut driver = MockDriver::new_with_size(212, 104);
        assert!(matches!(driver.show(), Err(DisplayError::NoImage)));
    }

    #[test]
    fn test_mock_driver_size_mismatch() {
        let mut driver = MockDriver::new_with_size(212, 104);
        assert!(driver.set_image(Canvas::new(250, 122, InkColor::White)).is_err());
        assert_eq!(driver.state().set_image_count, 0);
    }

    #[test]
    fn test_mock_driver_simulated_failure() {
        let mut driver = MockDriver::new_with_size(250, 122);
        driver.set_image(Canvas::new(250, 122, InkColor::White)).unwrap();

        driver.state_mut().simulate_show_failure = true;
        assert!(driver.show().is_err());

        driver.state_mut().simulate_show_failure = false;
        assert!(driver.show().is_ok());
    }
}
