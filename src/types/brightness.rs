// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for light control.
//!
//! The host works on a 0-255 scale; Grid Connect lights report and accept
//! brightness on their brightness data point in the 25-255 range.

use std::fmt;

use serde::Serialize;

use crate::error::ValueError;

/// Brightness level on the host scale (0-255).
///
/// # Examples
///
/// ```
/// use grid_connect::types::Brightness;
///
/// let full = Brightness::MAX;
/// assert_eq!(full.to_device(), 255);
///
/// // The device never goes below its minimum level
/// assert_eq!(Brightness::MIN.to_device(), 25);
///
/// let half = Brightness::from_device(140).unwrap();
/// assert_eq!(half.value(), 127);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Brightness(u8);

impl Brightness {
    /// Minimum host brightness.
    pub const MIN: Self = Self(0);

    /// Maximum host brightness.
    pub const MAX: Self = Self(255);

    /// Lowest level the device accepts.
    pub const DEVICE_MIN: u16 = 25;

    /// Highest level the device accepts.
    pub const DEVICE_MAX: u16 = 255;

    /// Creates a brightness value on the host scale.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the host-scale value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Converts a device-scale value to the host scale.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `raw` is outside the device range.
    pub fn from_device(raw: u16) -> Result<Self, ValueError> {
        if !(Self::DEVICE_MIN..=Self::DEVICE_MAX).contains(&raw) {
            return Err(ValueError::OutOfRange {
                min: Self::DEVICE_MIN,
                max: Self::DEVICE_MAX,
                actual: raw,
            });
        }
        let span = u32::from(Self::DEVICE_MAX - Self::DEVICE_MIN);
        let scaled = u32::from(raw - Self::DEVICE_MIN) * 255 / span;
        #[allow(clippy::cast_possible_truncation)]
        let value = scaled.min(255) as u8;
        Ok(Self(value))
    }

    /// Converts to the device scale.
    #[must_use]
    pub fn to_device(&self) -> u16 {
        let span = u32::from(Self::DEVICE_MAX - Self::DEVICE_MIN);
        #[allow(clippy::cast_possible_truncation)]
        let offset = (u32::from(self.0) * span / 255) as u16;
        Self::DEVICE_MIN + offset
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_map_to_device_bounds() {
        assert_eq!(Brightness::MIN.to_device(), Brightness::DEVICE_MIN);
        assert_eq!(Brightness::MAX.to_device(), Brightness::DEVICE_MAX);
        assert_eq!(Brightness::from_device(25).unwrap(), Brightness::MIN);
        assert_eq!(Brightness::from_device(255).unwrap(), Brightness::MAX);
    }

    #[test]
    fn round_trip_stays_within_one_step() {
        for value in [1u8, 17, 64, 128, 200, 254] {
            let back = Brightness::from_device(Brightness::new(value).to_device()).unwrap();
            assert!(value.abs_diff(back.value()) <= 1, "{value} -> {back}");
        }
    }

    #[test]
    fn rejects_out_of_range_device_values() {
        assert!(Brightness::from_device(10).is_err());
        assert!(Brightness::from_device(1000).is_err());
    }
}
