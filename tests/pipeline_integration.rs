/*
 *  tests/pipeline_integration.rs
 *
 *  End to end runs against the shipped resources and a mock panel
 *
 *  phatwx - weather on a pHAT
 *  (c) 2020-26 Stuart Hunter
 */

use std::cell::Cell;
use std::path::PathBuf;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use phatwx::assets::{load_icons, IconSet};
use phatwx::condition::IconCategory;
use phatwx::config::{DisplayConfig, DriverKind, PanelModel};
use phatwx::display::components::weather::ICON_POS;
use phatwx::display::{
    AccentColour, DisplayCapabilities, DisplayDriverFactory, InkColor, MockDriver, Palette, WeatherScene,
};
use phatwx::weather::{WeatherApiError, WeatherProvider, WeatherReading};
use phatwx::{run, PipelineError, RenderRequest};

const STAMP: &str = "19/10 14:05";

fn resources() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources")
}

fn request() -> RenderRequest {
    RenderRequest {
        city: "Yeovil".into(),
        country_code: "GB".into(),
        warning_temp: 25.0,
        resources: resources(),
        ink: InkColor::White,
        border: InkColor::Black,
    }
}

/// Provider returning a fixed result and counting calls
struct Canned {
    result: Result<WeatherReading, fn() -> WeatherApiError>,
    calls: Cell<usize>,
}

impl Canned {
    fn ok(pressure: i64, temp: f64, code: i32) -> Self {
        Self { result: Ok(WeatherReading::new(pressure, temp, code)), calls: Cell::new(0) }
    }

    fn failing(err: fn() -> WeatherApiError) -> Self {
        Self { result: Err(err), calls: Cell::new(0) }
    }
}

impl WeatherProvider for Canned {
    async fn fetch(&self, city: &str, country_code: &str) -> Result<WeatherReading, WeatherApiError> {
        assert_eq!((city, country_code), ("Yeovil", "GB"));
        self.calls.set(self.calls.get() + 1);
        match &self.result {
            Ok(reading) => Ok(reading.clone()),
            Err(make) => Err(make()),
        }
    }
}

fn shipped_icons() -> IconSet {
    load_icons(&resources(), &Palette::default()).unwrap()
}

#[test]
fn test_shipped_icons_cover_every_category() {
    let icons = shipped_icons();
    for category in IconCategory::KNOWN {
        let icon = icons.get(&category).unwrap_or_else(|| panic!("no icon for {}", category));
        assert!(icon.mask.as_slice().iter().any(|&m| m), "{} icon is empty", category);
        assert!(icon.mask.as_slice().iter().any(|&m| !m), "{} icon has no see-through pixels", category);
    }
}

#[tokio::test]
async fn test_sunny_reading_pastes_sun_icon() {
    let provider = Canned::ok(1013, 18.5, 800);
    let mut display = MockDriver::new_with_size(212, 104);

    let summary = run(&provider, &mut display, &request(), STAMP).await.unwrap();
    assert_eq!(summary.category, IconCategory::Sun);
    assert!(summary.icon_pasted);
    assert_eq!(provider.calls.get(), 1);

    let shown = display.shown().expect("frame shown");
    assert_eq!(shown.dimensions(), (212, 104));

    let sun = &shipped_icons()[&IconCategory::Sun];
    for y in 0..sun.image.height() {
        for x in 0..sun.image.width() {
            if !sun.mask.get(x, y) {
                continue;
            }
            let want = sun.image.get(x, y).and_then(InkColor::from_index);
            let got = shown.get_pixel(ICON_POS.x as u32 + x, ICON_POS.y as u32 + y);
            assert_eq!(got, want, "sun pixel {},{}", x, y);
        }
    }
}

#[tokio::test]
async fn test_unmapped_code_shows_placeholder() {
    let provider = Canned::ok(1013, 18.5, 999);
    let mut display = MockDriver::new_with_size(212, 104);

    let summary = run(&provider, &mut display, &request(), STAMP).await.unwrap();
    assert_eq!(summary.category, IconCategory::Unknown);
    assert!(!summary.icon_pasted);

    let shown = display.shown().expect("frame shown");
    let slot = WeatherScene::placeholder_area();
    assert!(shown.count_in(&slot, InkColor::Accent) > 0);
    // nothing white from an icon, the backdrop under the slot is black
    assert_eq!(shown.count_in(&slot, InkColor::White), 0);
}

#[tokio::test]
async fn test_warm_reading_uses_accent() {
    let provider = Canned::ok(1002, 27.25, 801);
    let mut display = MockDriver::new_with_size(212, 104);
    run(&provider, &mut display, &request(), STAMP).await.unwrap();

    let shown = display.shown().unwrap();
    let digits = Rectangle::new(Point::new(92, 36), Size::new(70, 18));
    assert!(shown.count_in(&digits, InkColor::Accent) > 0);
    assert_eq!(shown.count_in(&digits, InkColor::White), 0);
}

#[tokio::test]
async fn test_larger_panel() {
    let provider = Canned::ok(1013, 18.5, 500);
    let caps = DisplayCapabilities::new(250, 122, AccentColour::Yellow, "Inky pHAT (SSD1608)");
    let mut display = MockDriver::new(caps);
    let summary = run(&provider, &mut display, &request(), STAMP).await.unwrap();
    assert_eq!(summary.category, IconCategory::Rain);
    assert_eq!(display.shown().unwrap().dimensions(), (250, 122));
}

#[tokio::test]
async fn test_unsupported_resolution_fails_before_fetch() {
    let provider = Canned::ok(1013, 18.5, 800);
    let caps = DisplayCapabilities::new(128, 64, AccentColour::Red, "oled");
    let mut display = MockDriver::new(caps);

    let err = run(&provider, &mut display, &request(), STAMP).await.unwrap_err();
    assert!(matches!(err, PipelineError::Configuration(_)), "{:?}", err);
    assert_eq!(provider.calls.get(), 0);
    assert!(display.shown().is_none());
}

#[tokio::test]
async fn test_missing_background_is_resource_error() {
    let provider = Canned::ok(1013, 18.5, 800);
    let mut display = MockDriver::new_with_size(212, 104);
    let mut req = request();
    req.resources = std::env::temp_dir().join(format!("phatwx-empty-{}", std::process::id()));
    std::fs::create_dir_all(&req.resources).unwrap();

    let err = run(&provider, &mut display, &req, STAMP).await.unwrap_err();
    assert!(matches!(err, PipelineError::Resource(_)), "{:?}", err);
    assert_eq!(provider.calls.get(), 0);
    assert_eq!(display.state().show_count, 0);
    let _ = std::fs::remove_dir_all(&req.resources);
}

#[tokio::test]
async fn test_provider_failures_never_reach_the_panel() {
    let cases: [(fn() -> WeatherApiError, bool); 2] = [
        (|| WeatherApiError::MissingData("main.temp".into()), true),
        (|| WeatherApiError::ApiError { status: 404, message: "city not found".into() }, false),
    ];
    for (make, malformed) in cases {
        let provider = Canned::failing(make);
        let mut display = MockDriver::new_with_size(212, 104);
        let err = run(&provider, &mut display, &request(), STAMP).await.unwrap_err();
        if malformed {
            assert!(matches!(err, PipelineError::MalformedResponse(_)), "{:?}", err);
        } else {
            assert!(matches!(err, PipelineError::Network(_)), "{:?}", err);
        }
        assert_eq!(display.state().set_image_count, 0);
        assert_eq!(display.state().show_count, 0);
        assert_eq!(display.state().border, None);
    }
}

#[tokio::test]
async fn test_png_sink_writes_file() {
    let output = std::env::temp_dir().join(format!("phatwx-it-{}.png", std::process::id()));
    let config = DisplayConfig {
        model: Some(PanelModel::Phat),
        driver: Some(DriverKind::Png),
        output: Some(output.clone()),
        ..Default::default()
    };
    let mut display = DisplayDriverFactory::create_from_config(&config).unwrap();
    let provider = Canned::ok(1013, 18.5, 800);
    run(&provider, display.as_mut(), &request(), STAMP).await.unwrap();

    let png = tiny_skia::Pixmap::load_png(&output).unwrap();
    assert!(png.width() >= 212 && png.height() >= 104);
    let _ = std::fs::remove_file(&output);
}
