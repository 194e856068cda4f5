/*
 *  lib.rs
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

//! Fetch the current weather for one place and draw it on a three colour
//! Inky pHAT e-ink panel (or a PNG standing in for one).

pub mod assets;
pub mod condition;
pub mod config;
pub mod display;
pub mod draw;
pub mod error;
pub mod pipeline;
pub mod svgimage;
pub mod vframebuf;
pub mod weather;

pub use error::PipelineError;
pub use pipeline::{run, RenderRequest, RenderSummary};
