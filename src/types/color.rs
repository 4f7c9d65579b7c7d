// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color temperature for white-spectrum lights.

use std::fmt;

use serde::Serialize;

use crate::error::ValueError;

/// Color temperature in mireds (153-500).
///
/// The host uses mireds, where lower values are cooler. Grid Connect lights
/// take a 0-255 value on their color temperature data point, where 0 is the
/// warmest white and 255 the coolest.
///
/// - 153 (6500K) - Cool daylight
/// - 250 (4000K) - Neutral white
/// - 500 (2000K) - Warm candlelight
///
/// # Examples
///
/// ```
/// use grid_connect::types::ColorTemp;
///
/// let ct = ColorTemp::new(250).unwrap();
/// assert_eq!(ct.value(), 250);
///
/// assert_eq!(ColorTemp::COOL.to_device(), 255);
/// assert_eq!(ColorTemp::CANDLE.to_device(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ColorTemp(u16);

impl ColorTemp {
    /// Minimum color temperature (coolest, ~6500K).
    pub const MIN: u16 = 153;

    /// Maximum color temperature (warmest, ~2000K).
    pub const MAX: u16 = 500;

    /// Cool daylight (~6500K).
    pub const COOL: Self = Self(153);

    /// Neutral white (~4000K).
    pub const NEUTRAL: Self = Self(250);

    /// Candlelight (~2000K).
    pub const CANDLE: Self = Self(500);

    /// Creates a new color temperature value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [153, 500].
    pub fn new(value: u16) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the color temperature value in mireds.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns the approximate color temperature in Kelvin.
    #[must_use]
    pub fn to_kelvin(&self) -> u16 {
        #[allow(clippy::cast_possible_truncation)]
        let kelvin = (1_000_000 / u32::from(self.0)) as u16;
        kelvin
    }

    /// Converts to the device scale (0 = warmest, 255 = coolest).
    #[must_use]
    pub fn to_device(&self) -> u16 {
        let span = u32::from(Self::MAX - Self::MIN);
        let warmth = u32::from(Self::MAX - self.0);
        #[allow(clippy::cast_possible_truncation)]
        let raw = ((warmth * 255 + span / 2) / span) as u16;
        raw
    }

    /// Converts a device-scale value to mireds.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `raw` exceeds 255.
    pub fn from_device(raw: u16) -> Result<Self, ValueError> {
        if raw > 255 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 255,
                actual: raw,
            });
        }
        let span = u32::from(Self::MAX - Self::MIN);
        #[allow(clippy::cast_possible_truncation)]
        let offset = ((u32::from(raw) * span + 127) / 255) as u16;
        Ok(Self(Self::MAX - offset))
    }
}

impl Default for ColorTemp {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for ColorTemp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K", self.to_kelvin())
    }
}
