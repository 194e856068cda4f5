/*
 *  main.rs
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

use chrono::Local;
use env_logger::Env;
use log::{error, info};

use phatwx::config;
use phatwx::display::DisplayDriverFactory;
use phatwx::weather::Weather;
use phatwx::{run, PipelineError, RenderRequest};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Timestamp as shown on the panel, e.g. `19/10 14:05`
const TIMESTAMP_FORMAT: &str = "%d/%m %H:%M";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}: {}", env!("CARGO_PKG_NAME"), e);
            std::process::exit(2);
        }
    };

    let level = cfg.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    info!("This is {} - weather on a pHAT", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    if let Err(e) = render_once(&cfg).await {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn render_once(cfg: &config::Config) -> Result<(), PipelineError> {
    let mut display = DisplayDriverFactory::create_from_config(&cfg.display())?;
    let weather = Weather::new(&cfg.weather())?;
    let request = RenderRequest::from_config(cfg);
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

    let summary = run(&weather, display.as_mut(), &request, &timestamp).await?;
    info!(
        "Displayed {} at {} ({})",
        summary.reading,
        timestamp,
        if summary.icon_pasted { summary.category.name() } else { "placeholder" }
    );
    Ok(())
}
