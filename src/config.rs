/*
 *  config.rs
 *
 *  phatwx - weather on a pHAT
 *  (c) 2020-26 Stuart Hunter
 *
 *  YAML configuration layered under command line overrides
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

use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::display::color::{AccentColour, InkColor};
use crate::weather::OPENWEATHERMAP_URL;

pub const DEFAULT_CITY: &str = "Yeovil";
pub const DEFAULT_COUNTRY_CODE: &str = "GB";
pub const DEFAULT_WARNING_TEMP: f64 = 25.0;
pub const DEFAULT_RESOURCES: &str = "resources";
pub const DEFAULT_OUTPUT: &str = "phatwx.png";
pub const API_KEY_ENV: &str = "PHATWX_API_KEY";

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    /// temperature at or above which the reading is drawn in the accent ink
    pub warning_temp: Option<f64>,
    /// folder holding backdrop.* and icon-*.* files
    pub resources: Option<PathBuf>,
    pub weather: Option<WeatherConfig>,
    pub display: Option<DisplayConfig>,
    pub theme: Option<ThemeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WeatherConfig {
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>, // unset = wait for the transport
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub model: Option<PanelModel>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub colour: Option<AccentColour>,
    pub border: Option<InkColor>,
    pub driver: Option<DriverKind>,
    pub output: Option<PathBuf>,     // PNG written by the png driver
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ThemeConfig {
    /// primary ink for frame and text; the stock backdrop is dark
    pub ink: Option<InkColor>,
}

/// The pHAT variants the layout is drawn for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PanelModel {
    #[default]
    Phat,
    PhatSsd1608,
}

impl PanelModel {
    pub fn resolution(self) -> (u32, u32) {
        match self {
            PanelModel::Phat => (212, 104),
            PanelModel::PhatSsd1608 => (250, 122),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PanelModel::Phat => "Inky pHAT",
            PanelModel::PhatSsd1608 => "Inky pHAT (SSD1608)",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    #[default]
    Png,
    Mock,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "phatwx", version, about = "Current weather on an Inky pHAT", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, short = 'c', value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Enable debug log level
    #[arg(long, short = 'v', alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub api_key: Option<String>,
    #[arg(long)]
    pub warning_temp: Option<f64>,
    /// PNG file the simulated panel writes to
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
    /// compose and log, but do not write any output
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_from(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Everything `load` does except parsing argv and dumping.
pub fn load_from(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) key from the environment when nothing else supplied one
    apply_api_key_fallback(&mut cfg, std::env::var(API_KEY_ENV).ok());

    // 5) Validate
    validate(&cfg)?;

    Ok(cfg)
}

impl Config {
    pub fn warning_temp(&self) -> f64 {
        self.warning_temp.unwrap_or(DEFAULT_WARNING_TEMP)
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.resources.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCES))
    }

    pub fn weather(&self) -> WeatherConfig {
        self.weather.clone().unwrap_or_default()
    }

    pub fn display(&self) -> DisplayConfig {
        self.display.clone().unwrap_or_default()
    }

    /// Primary ink for text and frame lines
    pub fn ink(&self) -> InkColor {
        self.theme.as_ref().and_then(|t| t.ink).unwrap_or(InkColor::White)
    }
}

impl WeatherConfig {
    pub fn city(&self) -> &str {
        self.city.as_deref().unwrap_or(DEFAULT_CITY)
    }

    pub fn country_code(&self) -> &str {
        self.country_code.as_deref().unwrap_or(DEFAULT_COUNTRY_CODE)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(OPENWEATHERMAP_URL)
    }
}

impl DisplayConfig {
    pub fn border(&self) -> InkColor {
        self.border.unwrap_or(InkColor::Black)
    }

    pub fn output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/phatwx/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/phatwx/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/phatwx.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["phatwx.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    if src.warning_temp.is_some()   { dst.warning_temp = src.warning_temp; }
    if src.resources.is_some()      { dst.resources = src.resources; }
    // weather
    match (&mut dst.weather, src.weather) {
        (None, Some(w)) => dst.weather = Some(w),
        (Some(d), Some(s)) => merge_weather(d, s),
        _ => {}
    }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
    if src.theme.is_some()          { dst.theme = src.theme; }
}

fn merge_weather(dst: &mut WeatherConfig, src: WeatherConfig) {
    if src.city.is_some()          { dst.city = src.city; }
    if src.country_code.is_some()  { dst.country_code = src.country_code; }
    if src.api_key.is_some()       { dst.api_key = src.api_key; }
    if src.base_url.is_some()      { dst.base_url = src.base_url; }
    if src.timeout_secs.is_some()  { dst.timeout_secs = src.timeout_secs; }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.model.is_some()       { dst.model = src.model; }
    if src.width.is_some()       { dst.width = src.width; }
    if src.height.is_some()      { dst.height = src.height; }
    if src.colour.is_some()      { dst.colour = src.colour; }
    if src.border.is_some()      { dst.border = src.border; }
    if src.driver.is_some()      { dst.driver = src.driver; }
    if src.output.is_some()      { dst.output = src.output; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    if cli.debug                     { cfg.log_level = Some("debug".to_string()); }
    if cli.warning_temp.is_some()    { cfg.warning_temp = cli.warning_temp; }

    if cli.city.is_some() || cli.country.is_some() || cli.api_key.is_some() {
        let weather = cfg.weather.get_or_insert_with(WeatherConfig::default);
        if cli.city.is_some()        { weather.city = cli.city.clone(); }
        if cli.country.is_some()     { weather.country_code = cli.country.clone(); }
        if cli.api_key.is_some()     { weather.api_key = cli.api_key.clone(); }
    }

    if cli.output.is_some() || cli.dry_run {
        let display = cfg.display.get_or_insert_with(DisplayConfig::default);
        if cli.output.is_some()      { display.output = cli.output.clone(); }
        if cli.dry_run               { display.driver = Some(DriverKind::Mock); }
    }
}

fn apply_api_key_fallback(cfg: &mut Config, env_key: Option<String>) {
    let has_key = cfg.weather.as_ref().is_some_and(|w| w.api_key.is_some());
    if !has_key {
        if let Some(key) = env_key {
            cfg.weather.get_or_insert_with(WeatherConfig::default).api_key = Some(key);
        }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !cfg.warning_temp().is_finite() {
        return Err(ConfigError::Validation("warning_temp must be a finite number".into()));
    }

    let weather = cfg.weather();
    if weather.city().trim().is_empty() || weather.country_code().trim().is_empty() {
        return Err(ConfigError::Validation("weather city and country_code must not be empty".into()));
    }
    match weather.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {},
        _ => return Err(ConfigError::Validation(format!(
            "weather api_key required (config file, --api-key or {API_KEY_ENV})"
        ))),
    }
    if weather.timeout_secs == Some(0) {
        return Err(ConfigError::Validation("weather timeout_secs must be > 0".into()));
    }

    if let Some(display) = cfg.display.as_ref() {
        match (display.width, display.height) {
            (Some(w), Some(h)) if w == 0 || h == 0 => {
                return Err(ConfigError::Validation("display width/height must be > 0".into()));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ConfigError::Validation("display width and height must be set together".into()));
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> Cli {
        Cli { api_key: Some("k".into()), ..Default::default() }
    }

    #[test]
    fn test_yaml_parse_full() {
        let cfg = parse_yaml(
            "log_level: debug\n\
             warning_temp: 21.5\n\
             weather:\n  city: Sheffield\n  country_code: GB\n  api_key: abc\n\
             display:\n  model: phat-ssd1608\n  colour: yellow\n  border: accent\n  driver: mock\n\
             theme:\n  ink: black\n",
        )
        .unwrap();
        assert_eq!(cfg.warning_temp(), 21.5);
        assert_eq!(cfg.weather().city(), "Sheffield");
        let display = cfg.display();
        assert_eq!(display.model, Some(PanelModel::PhatSsd1608));
        assert_eq!(display.colour, Some(AccentColour::Yellow));
        assert_eq!(display.border(), InkColor::Accent);
        assert_eq!(display.driver, Some(DriverKind::Mock));
        assert_eq!(cfg.ink(), InkColor::Black);
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.warning_temp(), DEFAULT_WARNING_TEMP);
        assert_eq!(cfg.weather().city(), "Yeovil");
        assert_eq!(cfg.weather().country_code(), "GB");
        assert_eq!(cfg.weather().base_url(), OPENWEATHERMAP_URL);
        assert_eq!(cfg.ink(), InkColor::White);
        assert_eq!(cfg.display().border(), InkColor::Black);
        assert_eq!(cfg.resources_dir(), PathBuf::from("resources"));
    }

    #[test]
    fn test_cli_overrides_yaml() {
        let mut cfg = parse_yaml("weather:\n  city: Leeds\n  api_key: yaml\n").unwrap();
        let cli = Cli {
            city: Some("York".into()),
            debug: true,
            dry_run: true,
            ..Default::default()
        };
        apply_cli_overrides(&mut cfg, &cli);
        assert_eq!(cfg.weather().city(), "York");
        assert_eq!(cfg.weather().api_key.as_deref(), Some("yaml"));
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(cfg.display().driver, Some(DriverKind::Mock));
    }

    #[test]
    fn test_merge_is_option_by_option() {
        let mut dst = parse_yaml("display:\n  model: phat\n  output: a.png\n").unwrap();
        let src = parse_yaml("display:\n  output: b.png\n").unwrap();
        merge(&mut dst, src);
        let display = dst.display();
        assert_eq!(display.model, Some(PanelModel::Phat));
        assert_eq!(display.output(), PathBuf::from("b.png"));
    }

    #[test]
    fn test_env_key_only_fills_gaps() {
        let mut cfg = Config::default();
        apply_api_key_fallback(&mut cfg, Some("env".into()));
        assert_eq!(cfg.weather().api_key.as_deref(), Some("env"));

        let mut cfg = parse_yaml("weather:\n  api_key: file\n").unwrap();
        apply_api_key_fallback(&mut cfg, Some("env".into()));
        assert_eq!(cfg.weather().api_key.as_deref(), Some("file"));
    }

    #[test]
    fn test_validation() {
        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &with_key());
        assert!(validate(&cfg).is_ok());

        let no_key = Config::default();
        assert!(matches!(validate(&no_key), Err(ConfigError::Validation(_))));

        let mut half = cfg.clone();
        half.display = Some(DisplayConfig { width: Some(212), ..Default::default() });
        assert!(validate(&half).is_err());

        let mut hot = cfg.clone();
        hot.warning_temp = Some(f64::NAN);
        assert!(validate(&hot).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/phatwx.yaml")),
            ..with_key()
        };
        assert!(matches!(load_from(&cli), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_panel_models() {
        assert_eq!(PanelModel::Phat.resolution(), (212, 104));
        assert_eq!(PanelModel::PhatSsd1608.resolution(), (250, 122));
    }
}
