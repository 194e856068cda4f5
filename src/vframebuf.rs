/*
 *  vframebuf.rs
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::PixelColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::display::color::InkColor;

/// The panel-sized raster the scene is composed on.
pub type Canvas = VarFrameBuf<InkColor>;

/// A runtime-sized framebuffer for embedded-graphics.
#[derive(Debug, Clone, PartialEq)]
pub struct VarFrameBuf<C: PixelColor> {
    buf: Vec<C>,
    w: usize,
    h: usize,
}

impl<C: PixelColor> VarFrameBuf<C> {
    pub fn new(width: u32, height: u32, fill: C) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    /// Build a framebuffer by evaluating `f(x, y)` for every pixel, row-major
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> C,
    {
        let mut buf = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                buf.push(f(x, y));
            }
        }
        Self { buf, w: width as usize, h: height as usize }
    }

    /// (width, height) in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.w as u32, self.h as u32)
    }

    /// Immutable raw access
    pub fn as_slice(&self) -> &[C] { &self.buf }

    /// Clear to a color
    pub fn clear_color(&mut self, color: C) {
        self.buf.fill(color);
    }

    /// Pixel at (x,y), `None` when out of bounds
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<C> {
        self.idx(Point::new(x as i32, y as i32)).map(|i| self.buf[i])
    }

    /// Set a single pixel; out of bounds writes are dropped
    pub fn set_pixel(&mut self, p: Point, color: C) {
        if let Some(i) = self.idx(p) {
            self.buf[i] = color;
        }
    }

    /// Number of pixels inside `region` that hold `color`
    pub fn count_in(&self, region: &Rectangle, color: C) -> usize {
        region
            .points()
            .filter_map(|p| self.idx(p))
            .filter(|&i| self.buf[i] == color)
            .count()
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl<C: PixelColor> OriginDimensions for VarFrameBuf<C> {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl<C: PixelColor> DrawTarget for VarFrameBuf<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // colors are supplied for the whole area, clip while walking it
        for (p, c) in area.points().zip(colors) {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }
}
