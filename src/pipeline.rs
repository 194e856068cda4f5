/*
 *  pipeline.rs
 *
 *  phatwx - weather on a pHAT
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

//! One render pass: panel check, resources, fetch, classify, compose, push.

use log::{debug, info};
use std::path::PathBuf;

use crate::assets::{load_background, load_icons};
use crate::condition::{classify, IconCategory};
use crate::config::Config;
use crate::display::{InkColor, InkDisplay, WeatherScene};
use crate::error::PipelineError;
use crate::weather::{WeatherProvider, WeatherReading};

/// Everything a run needs besides its collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub city: String,
    pub country_code: String,
    pub warning_temp: f64,
    pub resources: PathBuf,
    pub ink: InkColor,
    pub border: InkColor,
}

impl RenderRequest {
    pub fn from_config(config: &Config) -> Self {
        let weather = config.weather();
        Self {
            city: weather.city().to_string(),
            country_code: weather.country_code().to_string(),
            warning_temp: config.warning_temp(),
            resources: config.resources_dir(),
            ink: config.ink(),
            border: config.display().border(),
        }
    }
}

/// What was put on the panel
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub reading: WeatherReading,
    pub category: IconCategory,
    pub icon_pasted: bool,
}

/// Run the pipeline once against `display`.
///
/// Nothing reaches the panel unless every stage before `show` succeeded;
/// an unsupported panel fails before the network is touched.
pub async fn run<P>(
    provider: &P,
    display: &mut dyn InkDisplay,
    request: &RenderRequest,
    timestamp: &str,
) -> Result<RenderSummary, PipelineError>
where
    P: WeatherProvider,
{
    let caps = display.capabilities().clone();
    caps.ensure_supported()?;
    info!("Panel: {} {}x{} ({:?} accent)", caps.name, caps.width, caps.height, caps.accent);

    let background = load_background(&request.resources)?;
    let icons = load_icons(&request.resources, &caps.palette())?;

    let reading = provider.fetch(&request.city, &request.country_code).await?;
    let category = classify(reading.condition_code);
    let icon_pasted = category.is_known() && icons.contains_key(&category);
    info!("Condition {} -> {}", reading.condition_code, category);

    let scene = WeatherScene::new(caps, request.ink);
    let canvas = scene.compose(&background, &icons, &reading, category, timestamp, request.warning_temp);
    debug!("Scene composed, {} icon", if icon_pasted { "with" } else { "without" });

    display.set_border(request.border)?;
    display.set_image(canvas)?;
    display.show()?;

    Ok(RenderSummary { reading, category, icon_pasted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{AccentColour, DisplayCapabilities, MockDriver};
    use crate::weather::WeatherApiError;
    use std::cell::Cell;

    struct Canned {
        reading: WeatherReading,
        calls: Cell<usize>,
    }

    impl WeatherProvider for Canned {
        async fn fetch(&self, _city: &str, _country_code: &str) -> Result<WeatherReading, WeatherApiError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.reading.clone())
        }
    }

    fn request() -> RenderRequest {
        RenderRequest {
            city: "Yeovil".into(),
            country_code: "GB".into(),
            warning_temp: 25.0,
            resources: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/resources")),
            ink: InkColor::White,
            border: InkColor::Black,
        }
    }

    #[test]
    fn test_request_from_defaults() {
        let req = RenderRequest::from_config(&Config::default());
        assert_eq!(req.city, "Yeovil");
        assert_eq!(req.country_code, "GB");
        assert_eq!(req.warning_temp, 25.0);
        assert_eq!(req.ink, InkColor::White);
        assert_eq!(req.border, InkColor::Black);
    }

    #[tokio::test]
    async fn test_unsupported_panel_skips_fetch() {
        let provider = Canned { reading: WeatherReading::new(1013, 18.5, 800), calls: Cell::new(0) };
        let mut display = MockDriver::new(DisplayCapabilities::new(128, 64, AccentColour::Red, "oled"));
        let err = run(&provider, &mut display, &request(), "19/10 14:05").await.unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
        assert_eq!(provider.calls.get(), 0);
        assert_eq!(display.state().show_count, 0);
    }

    #[tokio::test]
    async fn test_border_and_single_show() {
        let provider = Canned { reading: WeatherReading::new(1013, 18.5, 800), calls: Cell::new(0) };
        let mut display = MockDriver::new_with_size(212, 104);
        let summary = run(&provider, &mut display, &request(), "19/10 14:05").await.unwrap();
        assert_eq!(summary.category, IconCategory::Sun);
        assert!(summary.icon_pasted);
        assert_eq!(provider.calls.get(), 1);
        assert_eq!(display.state().border, Some(InkColor::Black));
        assert_eq!(display.state().set_image_count, 1);
        assert_eq!(display.state().show_count, 1);
    }
}
