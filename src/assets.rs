/*
 *  assets.rs
 *
 *  phatwx - weather on a pHAT
 *	(c) 2020-26 Stuart Hunter
 *
 *	Backdrop and icon loading, palette indexing and icon masks
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
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tiny_skia::Pixmap;

use crate::condition::IconCategory;
use crate::display::color::{InkColor, Palette};
use crate::svgimage::{SvgImageError, SvgImageRenderer};
use crate::vframebuf::Canvas;

/// File stem of the background image inside the resource folder
pub const BACKDROP_STEM: &str = "backdrop";

/// File name prefix of icon images
pub const ICON_PREFIX: &str = "icon-";

/// Palette indices an icon may contribute when pasted: white, black, accent
pub const PANEL_COLOURS: [u8; 3] = [0, 1, 2];

const EXTENSIONS: [&str; 2] = ["png", "svg"];

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("no backdrop.png or backdrop.svg in {0}")]
    MissingBackground(PathBuf),
    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("unsupported image type: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("pixel data is {actual} long, {width}x{height} needs {expected}")]
    SizeMismatch { width: u32, height: u32, expected: usize, actual: usize },
}

/// Raster of panel palette indices; anything the panel can't show is [`crate::display::UNMAPPED`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl IndexedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(AssetError::SizeMismatch { width, height, expected, actual: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    /// Index every pixel of an RGBA pixmap against the panel palette
    pub fn from_pixmap(pixmap: &Pixmap, palette: &Palette) -> Self {
        let pixels = pixmap
            .pixels()
            .iter()
            .map(|p| {
                let c = p.demultiply();
                palette.match_index([c.red(), c.green(), c.blue(), c.alpha()])
            })
            .collect();
        Self { width: pixmap.width(), height: pixmap.height(), pixels }
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x < self.width && y < self.height {
            self.pixels.get((y * self.width + x) as usize).copied()
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.pixels
    }
}

/// One boolean per pixel, true where the icon's own pixel is pasted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }
}

/// Build a transparency mask permitting only the `allowed` palette indices.
///
/// Keeps an icon's own background fill from overwriting the scene when it
/// is pasted.
pub fn build_mask(image: &IndexedImage, allowed: &[u8]) -> Mask {
    Mask {
        width: image.width,
        height: image.height,
        bits: image.pixels.iter().map(|p| allowed.contains(p)).collect(),
    }
}

/// An icon ready to paste
#[derive(Debug, Clone)]
pub struct IconAsset {
    pub category: IconCategory,
    pub image: IndexedImage,
    pub mask: Mask,
}

impl IconAsset {
    pub fn new(category: IconCategory, image: IndexedImage) -> Self {
        let mask = build_mask(&image, &PANEL_COLOURS);
        Self { category, image, mask }
    }
}

/// Loaded icons keyed (and iterated) by category
pub type IconSet = BTreeMap<IconCategory, IconAsset>;

/// Decode a PNG or SVG file into RGBA
pub fn load_pixmap(path: &Path) -> Result<Pixmap, AssetError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let decode_err = |reason: String| AssetError::Decode { path: path.to_path_buf(), reason };

    match ext.as_str() {
        "png" => {
            let data = fs::read(path).map_err(|source| AssetError::Io { path: path.to_path_buf(), source })?;
            Pixmap::decode_png(&data).map_err(|e| decode_err(e.to_string()))
        }
        "svg" => {
            let data = fs::read_to_string(path)
                .map_err(|source| AssetError::Io { path: path.to_path_buf(), source })?;
            SvgImageRenderer::new(&data)
                .and_then(|r| r.render())
                .map_err(|e: SvgImageError| decode_err(e.to_string()))
        }
        _ => Err(AssetError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Path of the backdrop image, PNG preferred over SVG
pub fn find_background(dir: &Path) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{BACKDROP_STEM}.{ext}")))
        .find(|p| p.is_file())
}

/// Load the backdrop; missing or undecodable is fatal
pub fn load_background(dir: &Path) -> Result<Pixmap, AssetError> {
    let path = find_background(dir).ok_or_else(|| AssetError::MissingBackground(dir.to_path_buf()))?;
    let pixmap = load_pixmap(&path)?;
    debug!("backdrop {} is {}x{}", path.display(), pixmap.width(), pixmap.height());
    Ok(pixmap)
}

/// Category named by an `icon-<category>.<ext>` file, if it is one
pub fn icon_category(path: &Path) -> Option<IconCategory> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let name = stem.strip_prefix(ICON_PREFIX)?;
    match name.parse::<IconCategory>() {
        Ok(category) if category.is_known() => Some(category),
        _ => {
            warn!("ignoring {}: '{}' is not an icon category", path.display(), name);
            None
        }
    }
}

/// Load every `icon-<category>.<ext>` in `dir`.
///
/// Files are visited in name order so a category present as both PNG and
/// SVG resolves the same way on every run (PNG wins).
pub fn load_icons(dir: &Path, palette: &Palette) -> Result<IconSet, AssetError> {
    let entries = fs::read_dir(dir).map_err(|source| AssetError::Io { path: dir.to_path_buf(), source })?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut icons = IconSet::new();
    for path in paths {
        let Some(category) = icon_category(&path) else { continue };
        if icons.contains_key(&category) {
            continue;
        }
        let pixmap = load_pixmap(&path)?;
        let image = IndexedImage::from_pixmap(&pixmap, palette);
        debug!("icon {} {}x{} from {}", category, image.width(), image.height(), path.display());
        icons.insert(category, IconAsset::new(category, image));
    }
    info!("Loaded {} weather icons from {}", icons.len(), dir.display());
    Ok(icons)
}

/// Nearest-neighbour scale `background` to the panel and flatten it onto the palette
pub fn fit_background(background: &Pixmap, width: u32, height: u32, palette: &Palette) -> Canvas {
    let (sw, sh) = (background.width().max(1), background.height().max(1));
    Canvas::from_fn(width, height, |x, y| {
        let sx = (x as u64 * sw as u64 / width.max(1) as u64) as u32;
        let sy = (y as u64 * sh as u64 / height.max(1) as u64) as u32;
        match background.pixel(sx, sy).map(|p| p.demultiply()) {
            Some(c) if c.alpha() >= 128 => palette.nearest([c.red(), c.green(), c.blue()]),
            _ => InkColor::White,
        }
    })
}
