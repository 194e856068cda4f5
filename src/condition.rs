/*
 *  condition.rs
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

//! OpenWeatherMap condition code to icon category mapping.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::LazyLock;

/// Icon bucket for a condition code.
///
/// Variants are declared in name order so the derived `Ord` walks the
/// table alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IconCategory {
    Cloud,
    Drizzle,
    Rain,
    Snow,
    Storm,
    Sun,
    Wind,
    Unknown,
}

impl IconCategory {
    /// Every category an icon can exist for
    pub const KNOWN: [IconCategory; 7] = [
        IconCategory::Cloud,
        IconCategory::Drizzle,
        IconCategory::Rain,
        IconCategory::Snow,
        IconCategory::Storm,
        IconCategory::Sun,
        IconCategory::Wind,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IconCategory::Cloud => "cloud",
            IconCategory::Drizzle => "drizzle",
            IconCategory::Rain => "rain",
            IconCategory::Snow => "snow",
            IconCategory::Storm => "storm",
            IconCategory::Sun => "sun",
            IconCategory::Wind => "wind",
            IconCategory::Unknown => "unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != IconCategory::Unknown
    }
}

impl Display for IconCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(pub String);

impl Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown icon category '{}'", self.0)
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for IconCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IconCategory::KNOWN
            .into_iter()
            .chain(std::iter::once(IconCategory::Unknown))
            .find(|c| c.name() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Provider condition codes per category, built on first use
static CONDITION_TABLE: LazyLock<BTreeMap<IconCategory, RangeInclusive<i32>>> = LazyLock::new(|| {
    BTreeMap::from([
        (IconCategory::Snow, 600..=622),
        (IconCategory::Rain, 500..=531),
        (IconCategory::Drizzle, 300..=321),
        (IconCategory::Cloud, 801..=804),
        (IconCategory::Sun, 800..=800),
        (IconCategory::Storm, 200..=232),
        (IconCategory::Wind, 701..=781),
    ])
});

/// Map a provider condition code onto an icon category.
///
/// Total over `i32`; codes outside every set are [`IconCategory::Unknown`].
pub fn classify(code: i32) -> IconCategory {
    CONDITION_TABLE
        .iter()
        .find(|(_, codes)| codes.contains(&code))
        .map(|(category, _)| *category)
        .unwrap_or(IconCategory::Unknown)
}
