/*
 *  error.rs
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

//! Run-level error taxonomy. Every variant is fatal for the invocation.

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::display::{DisplayError, DisplayFactoryError};
use crate::weather::WeatherApiError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad settings, unsupported panel or no usable driver
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network error: {0}")]
    Network(#[source] WeatherApiError),

    #[error("malformed weather response: {0}")]
    MalformedResponse(#[source] WeatherApiError),

    /// Backdrop or icon could not be loaded
    #[error("resource error: {0}")]
    Resource(#[from] AssetError),

    #[error("display error: {0}")]
    Display(#[source] DisplayError),
}

impl PipelineError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Configuration(_) => 2,
            _ => 1,
        }
    }
}

impl From<WeatherApiError> for PipelineError {
    fn from(err: WeatherApiError) -> Self {
        match err {
            WeatherApiError::ApiKeyError(msg) => PipelineError::Configuration(msg),
            e if e.is_malformed() => PipelineError::MalformedResponse(e),
            e => PipelineError::Network(e),
        }
    }
}

impl From<DisplayError> for PipelineError {
    fn from(err: DisplayError) -> Self {
        match err {
            DisplayError::UnsupportedResolution { .. } => PipelineError::Configuration(err.to_string()),
            e => PipelineError::Display(e),
        }
    }
}

impl From<DisplayFactoryError> for PipelineError {
    fn from(err: DisplayFactoryError) -> Self {
        PipelineError::Configuration(err.to_string())
    }
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        PipelineError::Configuration(err.to_string())
    }
}
