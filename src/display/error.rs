/*
 *  display/error.rs
 *
 *  phatwx - weather on a pHAT
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error types for display subsystem
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

use std::fmt;
use std::error::Error;

/// Unified error type for all display operations
#[derive(Debug)]
pub enum DisplayError {
    /// Panel reports a resolution no layout exists for
    UnsupportedResolution { width: u32, height: u32 },

    /// Canvas handed over does not match the panel
    DimensionMismatch { expected: (u32, u32), actual: (u32, u32) },

    /// show() called before set_image()
    NoImage,

    /// Writing the simulated panel output failed
    Io(std::io::Error),

    /// Encoding the simulated panel output failed
    Encoding(String),

    /// Generic error with message
    Other(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::UnsupportedResolution { width, height } =>
                write!(f, "Unsupported display resolution {}x{} (expected 212x104 or 250x122)", width, height),
            DisplayError::DimensionMismatch { expected, actual } =>
                write!(f, "Image size mismatch: panel is {}x{}, image is {}x{}",
                    expected.0, expected.1, actual.0, actual.1),
            DisplayError::NoImage =>
                write!(f, "No image set before show()"),
            DisplayError::Io(err) =>
                write!(f, "Display output error: {}", err),
            DisplayError::Encoding(msg) =>
                write!(f, "Display encoding error: {}", msg),
            DisplayError::Other(msg) =>
                write!(f, "{}", msg),
        }
    }
}

impl Error for DisplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DisplayError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(err: std::io::Error) -> Self {
        DisplayError::Io(err)
    }
}

/// Factory error types
#[derive(Debug)]
pub enum DisplayFactoryError {
    /// Only one of width/height was configured
    IncompleteResolution,

    /// Detected or configured resolution is not a supported pHAT
    UnsupportedResolution { width: u32, height: u32 },
}

impl fmt::Display for DisplayFactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayFactoryError::IncompleteResolution =>
                write!(f, "Display width and height must be configured together"),
            DisplayFactoryError::UnsupportedResolution { width, height } =>
                write!(f, "This display does not support {}x{}", width, height),
        }
    }
}

impl Error for DisplayFactoryError {}
