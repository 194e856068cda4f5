/*
 *  display/factory.rs
 *
 *  phatwx - weather on a pHAT
 *  (c) 2020-26 Stuart Hunter
 *
 *  Panel detection and driver construction from configuration
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

use crate::config::{DisplayConfig, DriverKind};
use crate::display::drivers::mock::MockDriver;
use crate::display::drivers::png::PngDriver;
use crate::display::error::DisplayFactoryError;
use crate::display::traits::{DisplayCapabilities, InkDisplay};
use log::{info, debug};

/// Type alias for boxed display driver trait objects
pub type BoxedDriver = Box<dyn InkDisplay>;

/// Factory for creating display drivers from configuration
pub struct DisplayDriverFactory;

impl DisplayDriverFactory {
    /// Resolve the attached panel's capabilities
    ///
    /// An explicit width/height wins over the model preset. Whatever is
    /// resolved must be one of the supported pHAT geometries, otherwise this
    /// fails before anything else in the run happens.
    pub fn detect(config: &DisplayConfig) -> Result<DisplayCapabilities, DisplayFactoryError> {
        let model = config.model.unwrap_or_default();
        let (width, height) = match (config.width, config.height) {
            (Some(w), Some(h)) => (w, h),
            (None, None) => model.resolution(),
            _ => return Err(DisplayFactoryError::IncompleteResolution),
        };
        let caps = DisplayCapabilities::new(width, height, config.colour.unwrap_or_default(), model.name());
        debug!("Detected {} {}x{} ({:?} accent)", caps.name, width, height, caps.accent);
        if !caps.is_supported() {
            return Err(DisplayFactoryError::UnsupportedResolution { width, height });
        }
        Ok(caps)
    }

    /// Create a display driver from configuration
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = DisplayConfig {
    ///     model: Some(PanelModel::Phat),
    ///     driver: Some(DriverKind::Png),
    ///     ..Default::default()
    /// };
    ///
    /// let driver = DisplayDriverFactory::create_from_config(&config)?;
    /// ```
    pub fn create_from_config(
        config: &DisplayConfig
    ) -> Result<BoxedDriver, DisplayFactoryError> {
        let caps = Self::detect(config)?;
        match config.driver.unwrap_or_default() {
            DriverKind::Png => {
                let output = config.output();
                info!("Using simulated {} -> {}", caps.name, output.display());
                Ok(Box::new(PngDriver::new(caps, &output)))
            }
            DriverKind::Mock => {
                info!("Dry run: {} output is discarded", caps.name);
                Ok(Box::new(MockDriver::new(caps)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelModel;
    use crate::display::color::AccentColour;

    #[test]
    fn test_detect_model_presets() {
        let caps = DisplayDriverFactory::detect(&DisplayConfig::default()).unwrap();
        assert_eq!(caps.resolution(), (212, 104));
        assert_eq!(caps.accent, AccentColour::Red);

        let config = DisplayConfig {
            model: Some(PanelModel::PhatSsd1608),
            colour: Some(AccentColour::Yellow),
            ..Default::default()
        };
        let caps = DisplayDriverFactory::detect(&config).unwrap();
        assert_eq!(caps.resolution(), (250, 122));
        assert_eq!(caps.accent, AccentColour::Yellow);
    }

    #[test]
    fn test_detect_rejects_unsupported_resolution() {
        let config = DisplayConfig { width: Some(400), height: Some(300), ..Default::default() };
        assert!(matches!(
            DisplayDriverFactory::detect(&config),
            Err(DisplayFactoryError::UnsupportedResolution { width: 400, height: 300 })
        ));
    }

    #[test]
    fn test_detect_rejects_half_resolution() {
        let config = DisplayConfig { height: Some(104), ..Default::default() };
        assert!(matches!(
            DisplayDriverFactory::detect(&config),
            Err(DisplayFactoryError::IncompleteResolution)
        ));
    }

    #[test]
    fn test_create_mock_driver() {
        let config = DisplayConfig { driver: Some(DriverKind::Mock), ..Default::default() };
        let driver = DisplayDriverFactory::create_from_config(&config).unwrap();
        assert_eq!(driver.dimensions(), (212, 104));
    }
}
